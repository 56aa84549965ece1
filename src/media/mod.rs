pub(crate) mod cache;
pub(crate) mod metadata;
pub(crate) mod provider;
