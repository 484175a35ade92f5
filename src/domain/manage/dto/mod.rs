pub mod manage_request;
pub mod operation_result;
