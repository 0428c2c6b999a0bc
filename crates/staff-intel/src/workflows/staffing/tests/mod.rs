mod common;
mod emergency;
