pub mod policy_model;
pub mod training_log;
