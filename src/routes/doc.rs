use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    analytics::{
        AttendanceRow, DailyRevenue, DashboardReport, DateRange, ItemMix, ItemStat,
        RevenueTotals, SalonPerformance, StaffTips,
    },
    booking::BookingChannel,
    dto::{
        Deleted,
        analytics::AttendanceReport,
        appointments::{AppointmentList, BookingRequest, UpdateAppointmentStatusRequest},
        auth::{AcceptInvitationRequest, LoginRequest, LoginResponse, RegisterRequest},
        catalog::{
            CloneCatalogRequest, CloneCatalogResult, ProductList, ServiceList,
            StockAdjustRequest, UpsertProductRequest, UpsertServiceRequest,
        },
        sales::{CancelSaleRequest, RecordSaleRequest, SaleLineRequest, SaleList},
        salons::{PublicCatalog, PublicStaff, SalonList, UpsertSalonRequest},
        schedules::{ScheduleList, ToggleScheduleRequest, ToggleScheduleResult},
        staff::{InviteStaffRequest, StaffList, UpdateStaffRequest},
    },
    entity::enums::{AppointmentStatus, ItemType, PaymentMethod, Role, SaleStatus, StaffStatus},
    models::{Account, Appointment, Product, Sale, SaleItem, Salon, Service, StaffMember, StaffSchedule},
    response::Meta,
    routes::{
        analytics, appointments, auth, catalog, health, products, public, salons, sales,
        schedules, staff,
    },
    scope::Scope,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::accept_invitation,
        auth::current_scope,
        salons::list_salons,
        salons::get_salon,
        salons::create_salon,
        salons::update_salon,
        salons::delete_salon,
        staff::list_staff,
        staff::invite_staff,
        staff::update_staff,
        staff::remove_staff,
        catalog::list_services,
        catalog::create_service,
        catalog::update_service,
        catalog::delete_service,
        catalog::clone_catalog,
        products::list_products,
        products::list_critical_stock,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::adjust_stock,
        sales::list_sales,
        sales::recent_sales,
        sales::record_sale,
        sales::cancel_sale,
        appointments::list_appointments,
        appointments::create_appointment,
        appointments::update_status,
        schedules::list_schedules,
        schedules::toggle_schedule,
        analytics::dashboard,
        analytics::attendance,
        analytics::attendance_export,
        public::salon_catalog,
        public::create_booking
    ),
    components(
        schemas(
            Account,
            Scope,
            Role,
            StaffStatus,
            ItemType,
            PaymentMethod,
            SaleStatus,
            AppointmentStatus,
            BookingChannel,
            Salon,
            StaffMember,
            Service,
            Product,
            Sale,
            SaleItem,
            Appointment,
            StaffSchedule,
            RegisterRequest,
            LoginRequest,
            AcceptInvitationRequest,
            LoginResponse,
            UpsertSalonRequest,
            SalonList,
            PublicCatalog,
            PublicStaff,
            InviteStaffRequest,
            UpdateStaffRequest,
            StaffList,
            UpsertServiceRequest,
            CloneCatalogRequest,
            CloneCatalogResult,
            ServiceList,
            UpsertProductRequest,
            StockAdjustRequest,
            ProductList,
            SaleLineRequest,
            RecordSaleRequest,
            CancelSaleRequest,
            SaleList,
            ToggleScheduleRequest,
            ToggleScheduleResult,
            ScheduleList,
            BookingRequest,
            UpdateAppointmentStatusRequest,
            AppointmentList,
            DateRange,
            RevenueTotals,
            DailyRevenue,
            SalonPerformance,
            ItemStat,
            ItemMix,
            StaffTips,
            DashboardReport,
            AttendanceRow,
            AttendanceReport,
            Meta,
            Deleted
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication and scope endpoints"),
        (name = "Salons", description = "Salon endpoints"),
        (name = "Staff", description = "Collaborator endpoints"),
        (name = "Services", description = "Service catalog endpoints"),
        (name = "Products", description = "Product and stock endpoints"),
        (name = "Sales", description = "Point of sale endpoints"),
        (name = "Appointments", description = "Calendar endpoints"),
        (name = "Schedules", description = "Presence tag endpoints"),
        (name = "Analytics", description = "Dashboard and attendance endpoints"),
        (name = "Public", description = "Online booking endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
