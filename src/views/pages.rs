//! Page view models assembled from status service output.

use serde::Serialize;

use crate::error::ServiceError;
use crate::process::ProcessSnapshot;
use crate::service::{HealthReport, StatusService};
use crate::utils::{display_time_now, format_uptime};

/// A dashboard page and the template that renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// `/`
    Home,
    /// `/dashboard`
    Dashboard,
    /// `/test`
    ApiTest,
    /// `/status`
    Status,
    /// `/admin`
    Admin,
    /// `/login`
    Login,
}

impl Page {
    /// Template name. Each template extends its own layout.
    pub fn template(self) -> &'static str {
        match self {
            Page::Home => "pages/home.html",
            Page::Dashboard => "pages/dashboard.html",
            Page::ApiTest => "pages/test.html",
            Page::Status => "pages/status.html",
            Page::Admin => "pages/admin.html",
            Page::Login => "pages/login.html",
        }
    }

    /// Page title.
    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Dashboard => "Dashboard",
            Page::ApiTest => "API Testing",
            Page::Status => "System Status",
            Page::Admin => "Admin",
            Page::Login => "Login",
        }
    }

    /// Short name used as a metrics label.
    pub fn name(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Dashboard => "dashboard",
            Page::ApiTest => "test",
            Page::Status => "status",
            Page::Admin => "admin",
            Page::Login => "login",
        }
    }

    /// Message shown when the page cannot be produced.
    pub fn failure_message(self) -> &'static str {
        match self {
            Page::Dashboard => "Failed to load dashboard",
            Page::ApiTest => "Failed to load test page",
            Page::Status => "Failed to load status page",
            _ => "Internal server error",
        }
    }
}

/// Endpoint row in the dashboard tables.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EndpointInfo {
    /// HTTP method.
    pub method: &'static str,
    /// Badge color class.
    pub method_color: &'static str,
    /// Path.
    pub endpoint: &'static str,
    /// What it does.
    pub description: &'static str,
}

/// JSON endpoints listed on the dashboard and test pages.
pub const API_ENDPOINTS: &[EndpointInfo] = &[
    EndpointInfo {
        method: "GET",
        method_color: "success",
        endpoint: "/api/test/set_status",
        description: "Set system status (GET request)",
    },
    EndpointInfo {
        method: "POST",
        method_color: "primary",
        endpoint: "/api/test/set_status",
        description: "Set system status with custom data",
    },
    EndpointInfo {
        method: "GET",
        method_color: "success",
        endpoint: "/api/test/get_status",
        description: "Get current system status",
    },
    EndpointInfo {
        method: "POST",
        method_color: "primary",
        endpoint: "/api/test/test_data",
        description: "Test endpoint with data validation",
    },
    EndpointInfo {
        method: "GET",
        method_color: "success",
        endpoint: "/api/test/health",
        description: "Service health check",
    },
    EndpointInfo {
        method: "POST",
        method_color: "primary",
        endpoint: "/api/test/legacy",
        description: "Legacy echo endpoint",
    },
];

/// Fields every page receives.
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    /// Page title.
    pub title: &'static str,
    /// Server time when rendered.
    pub current_time: String,
    /// Deployment environment.
    pub environment: String,
    /// Service version.
    pub version: String,
    /// Operating system.
    pub platform: &'static str,
    /// CPU architecture.
    pub arch: &'static str,
}

impl PageMeta {
    fn new(page: Page, service: &StatusService) -> Self {
        Self {
            title: page.title(),
            current_time: display_time_now(),
            environment: service.environment().to_string(),
            version: service.version().to_string(),
            platform: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        }
    }
}

/// Home and admin pages.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    /// Common fields.
    pub meta: PageMeta,
    /// Whole seconds since start.
    pub uptime_secs: u64,
    /// Uptime as "1h 2m 3s".
    pub uptime_display: String,
    /// Resident memory in MiB.
    pub memory_mib: u64,
}

/// Memory figures in MiB.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MemoryBreakdown {
    /// Resident set size.
    pub rss: u64,
    /// Peak resident set size.
    pub peak_rss: u64,
    /// Virtual size.
    pub virtual_size: u64,
}

/// Server block on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ServerStatus {
    /// Always "Running" while serving.
    pub status: &'static str,
    /// Uptime as "1h 2m 3s".
    pub uptime_display: String,
    /// Deployment environment.
    pub environment: String,
    /// Service version.
    pub version: String,
    /// Operating system.
    pub platform: &'static str,
    /// CPU architecture.
    pub arch: &'static str,
    /// Memory figures.
    pub memory: MemoryBreakdown,
}

/// Dashboard page.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// Common fields.
    pub meta: PageMeta,
    /// Time the data was sampled.
    pub last_updated: String,
    /// Result of the health check.
    pub healthy: bool,
    /// Server block.
    pub server: ServerStatus,
    /// Endpoint table.
    pub api_endpoints: &'static [EndpointInfo],
}

/// API testing page.
#[derive(Debug, Clone, Serialize)]
pub struct ApiTestView {
    /// Common fields.
    pub meta: PageMeta,
    /// Endpoint table.
    pub api_endpoints: &'static [EndpointInfo],
}

/// One row of the health table.
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckRow {
    /// Check name.
    pub name: &'static str,
    /// Passed or not.
    pub status: bool,
    /// Measured value.
    pub details: String,
}

/// Usage bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Gauge {
    /// 0 to 100.
    pub percentage: u64,
    /// `success`, `warning` or `danger`.
    pub color: &'static str,
}

impl Gauge {
    /// Gauge of `used` against `limit`, capped at 100%.
    pub fn of(used: u64, limit: u64) -> Self {
        let percentage = if limit == 0 {
            100
        } else {
            (used.saturating_mul(100) / limit).min(100)
        };
        let color = match percentage {
            p if p > 80 => "danger",
            p if p > 60 => "warning",
            _ => "success",
        };
        Self { percentage, color }
    }
}

/// One row of the services list.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceRow {
    /// Component name.
    pub name: &'static str,
    /// Up or not.
    pub status: bool,
}

/// Status page.
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    /// Common fields.
    pub meta: PageMeta,
    /// Result of the health check.
    pub healthy: bool,
    /// Uptime as "1h 2m 3s".
    pub uptime_display: String,
    /// Resident memory in MiB.
    pub memory_mib: u64,
    /// Health limit in MiB.
    pub memory_limit_mib: u64,
    /// Health table.
    pub health_checks: Vec<HealthCheckRow>,
    /// Memory usage against the health limit.
    pub memory_bar: Gauge,
    /// Services list.
    pub services: Vec<ServiceRow>,
}

/// Login page.
#[derive(Debug, Clone, Serialize)]
pub struct LoginView {
    /// Common fields.
    pub meta: PageMeta,
}

/// Error page.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorView {
    /// Page title.
    pub title: &'static str,
    /// Summary.
    pub message: &'static str,
    /// Detail.
    pub error: Option<String>,
}

impl ErrorView {
    /// Error page for a failed `page`.
    pub fn for_page(page: Page, error: impl ToString) -> Self {
        Self {
            title: "Error",
            message: page.failure_message(),
            error: Some(error.to_string()),
        }
    }
}

/// Home or admin summary.
pub fn summary(page: Page, service: &StatusService) -> Result<SummaryView, ServiceError> {
    let snapshot = service.sample()?;
    Ok(SummaryView {
        meta: PageMeta::new(page, service),
        uptime_secs: snapshot.uptime.as_secs(),
        uptime_display: format_uptime(snapshot.uptime.as_secs()),
        memory_mib: snapshot.memory.rss_mib(),
    })
}

/// Dashboard with a health evaluation of the same sample.
pub fn dashboard(service: &StatusService) -> Result<DashboardView, ServiceError> {
    let snapshot = service.sample()?;
    let healthy = HealthReport::evaluate(&snapshot, service.memory_limit_bytes()).healthy;

    Ok(DashboardView {
        meta: PageMeta::new(Page::Dashboard, service),
        last_updated: display_time_now(),
        healthy,
        server: server_status(service, &snapshot),
        api_endpoints: API_ENDPOINTS,
    })
}

fn server_status(service: &StatusService, snapshot: &ProcessSnapshot) -> ServerStatus {
    ServerStatus {
        status: "Running",
        uptime_display: format_uptime(snapshot.uptime.as_secs()),
        environment: service.environment().to_string(),
        version: service.version().to_string(),
        platform: std::env::consts::OS,
        arch: std::env::consts::ARCH,
        memory: MemoryBreakdown {
            rss: snapshot.memory.rss_mib(),
            peak_rss: snapshot.memory.peak_rss_mib(),
            virtual_size: snapshot.memory.virtual_size_mib(),
        },
    }
}

/// API testing page.
pub fn api_test(service: &StatusService) -> ApiTestView {
    ApiTestView {
        meta: PageMeta::new(Page::ApiTest, service),
        api_endpoints: API_ENDPOINTS,
    }
}

/// Status page with health checks and memory gauge.
pub fn status(service: &StatusService) -> Result<StatusView, ServiceError> {
    let snapshot = service.sample()?;
    let limit = service.memory_limit_bytes();
    let report = HealthReport::evaluate(&snapshot, limit);
    let healthy = report.healthy;
    let uptime_secs = snapshot.uptime.as_secs();

    let health_checks = vec![
        HealthCheckRow {
            name: "Memory Usage",
            status: report.checks.memory_ok,
            details: format!("{} MiB used", snapshot.memory.rss_mib()),
        },
        HealthCheckRow {
            name: "Uptime",
            status: report.checks.uptime_ok,
            details: format!("{} seconds", uptime_secs),
        },
        HealthCheckRow {
            name: "Status Service",
            status: healthy,
            details: if healthy {
                "Service healthy".to_string()
            } else {
                "Service issues detected".to_string()
            },
        },
    ];

    Ok(StatusView {
        meta: PageMeta::new(Page::Status, service),
        healthy,
        uptime_display: format_uptime(uptime_secs),
        memory_mib: snapshot.memory.rss_mib(),
        memory_limit_mib: limit / (1024 * 1024),
        health_checks,
        memory_bar: Gauge::of(snapshot.memory.rss, limit),
        services: vec![
            ServiceRow {
                name: "HTTP Server",
                status: true,
            },
            ServiceRow {
                name: "Status Service",
                status: healthy,
            },
            ServiceRow {
                name: "Template Engine",
                status: true,
            },
        ],
    })
}

/// Login page.
pub fn login(service: &StatusService) -> LoginView {
    LoginView {
        meta: PageMeta::new(Page::Login, service),
    }
}
