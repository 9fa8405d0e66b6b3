mod cursor;
mod result_set;
mod row;

pub use cursor::QueryCursor;
pub use result_set::ResultSet;
pub use row::CustomDbRow;
