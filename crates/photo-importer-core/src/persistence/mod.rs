mod db;

pub use db::{ImportIndex, SqliteIndex};
