pub mod extraction_config;
