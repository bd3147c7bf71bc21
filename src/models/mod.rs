pub mod backup_record;
pub mod backup_status;
pub mod config;
pub mod config_validator;
pub mod error;
pub mod resource_file;
