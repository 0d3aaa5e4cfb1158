pub mod require_api_key;
