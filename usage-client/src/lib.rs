pub mod classify;
pub mod db;
pub mod domain;
