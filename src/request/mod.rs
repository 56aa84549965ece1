pub(crate) mod view_request;
