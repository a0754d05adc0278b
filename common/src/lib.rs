pub mod db;
pub mod entities;
pub mod repositories;
pub mod settings;
