pub mod ct_monitor;
pub mod typosquat;
