//! 数据源层：学生数据源抽象与实现（HTTP / Mock）

pub mod http;
pub mod mock;
pub mod traits;

pub use http::HttpDataSource;
pub use mock::MockDataSource;
pub use traits::{SourceCategory, SourceError, StudentDataSource};
