mod flatzinc;
pub use flatzinc::FlatZincWriter;

mod instance_json;
pub use instance_json::InstanceJsonReader;
