pub(crate) mod bars;
pub(crate) mod envelope;
