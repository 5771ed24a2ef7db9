pub mod itn_request;
