
pub use app::{TestApp, bearer, get_json_body, make_test_app};
pub use multipart::MultipartBuilder;
