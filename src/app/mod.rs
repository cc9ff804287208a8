mod http;
mod load;


pub(crate) use http::run_http;
pub(crate) use load::run_load;
