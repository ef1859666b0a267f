pub mod http;
pub mod storage;
pub mod stream;
pub mod notify;
