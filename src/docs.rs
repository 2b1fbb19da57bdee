use crate::api::attendance::{
    AttendanceQuery, AttendanceStatusResponse, ClockReq, ClockResponse,
    PaginatedAttendanceResponse,
};
use crate::api::employee::{EmployeeListItem, EmployeeListResponse, UpdateEmployeeDetails};
use crate::api::payslip::{PaginatedPayslipResponse, PayslipQuery, SendPayslip};
use crate::api::profile::ProfileResponse;
use crate::api::roles::{CreateRoleGrant, RoleGrant};
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::EmployeeDetails;
use crate::model::payslip::Payslip;
use crate::models::{LoginReqDto, RegisterReq};
use crate::shift::{ClockKind, ClockStatus, ShiftConfig};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Time Clock Portal API",
        version = "1.0.0",
        description = r#"
## Employee Time-Clock Portal

This API powers a small employee time-tracking portal.

### Key Features
- **Time Tracking**
  - Clock in / clock out with a selfie reference, classified against the
    employee's shift window (early / onTime / late / overtime)
- **Attendance History**
  - Per-employee history, newest first, with current clocked-in state
- **Employee Management**
  - Admin-managed positions, pay rates and shift windows
- **Payslips**
  - Admins issue payslips; employees view their own
- **Role Grants**
  - Auditable role assignment applied at registration

### Security
Protected endpoints use **JWT Bearer authentication**. Admin-only
operations require the admin role.

All shift-window arithmetic runs in Philippine Time (UTC+8).

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,

        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::history,
        crate::api::attendance::status,

        crate::api::employee::list_employees,
        crate::api::employee::update_details,
        crate::api::employee::employee_attendance,

        crate::api::payslip::send_payslip,
        crate::api::payslip::list_payslips,

        crate::api::profile::get_profile,
        crate::api::profile::update_profile,

        crate::api::roles::list_grants,
        crate::api::roles::create_grant,
        crate::api::roles::delete_grant
    ),
    components(
        schemas(
            RegisterReq,
            LoginReqDto,
            ClockReq,
            ClockResponse,
            ClockKind,
            ClockStatus,
            ShiftConfig,
            AttendanceQuery,
            AttendanceRecord,
            AttendanceStatusResponse,
            PaginatedAttendanceResponse,
            EmployeeDetails,
            EmployeeListItem,
            EmployeeListResponse,
            UpdateEmployeeDetails,
            SendPayslip,
            PayslipQuery,
            Payslip,
            PaginatedPayslipResponse,
            ProfileResponse,
            RoleGrant,
            CreateRoleGrant
        )
    ),
    tags(
        (name = "Auth", description = "Registration and token APIs"),
        (name = "Attendance", description = "Clock actions and history APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Payslip", description = "Payslip APIs"),
        (name = "Profile", description = "Own profile APIs"),
        (name = "Roles", description = "Role grant APIs"),
    )
)]
pub struct ApiDoc;
