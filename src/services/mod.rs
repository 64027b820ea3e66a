// Business logic services

pub mod calendar_export_service;
pub mod openai_client;
pub mod plan_generation_service;
pub mod progress_insights_service;
pub mod progress_service;
pub mod schedule_service;
pub mod template_service;

pub use openai_client::OpenAiClient;
pub use plan_generation_service::PlanGenerationService;
pub use progress_service::ProgressService;
pub use schedule_service::ScheduleService;
pub use template_service::TemplateService;
