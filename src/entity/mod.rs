pub mod appointments;
pub mod audit_logs;
pub mod enums;
pub mod products;
pub mod profiles;
pub mod sale_items;
pub mod salon_members;
pub mod salons;
pub mod sales;
pub mod services;
pub mod staff;
pub mod staff_schedules;

pub use appointments::Entity as Appointments;
pub use audit_logs::Entity as AuditLogs;
pub use products::Entity as Products;
pub use profiles::Entity as Profiles;
pub use sale_items::Entity as SaleItems;
pub use salon_members::Entity as SalonMembers;
pub use salons::Entity as Salons;
pub use sales::Entity as Sales;
pub use services::Entity as Services;
pub use staff::Entity as Staff;
pub use staff_schedules::Entity as StaffSchedules;
