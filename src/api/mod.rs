pub mod attendance;
pub mod employee;
pub mod payslip;
pub mod profile;
pub mod roles;
