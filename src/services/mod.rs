pub mod budget_service;
pub mod planner_service;
pub mod pricing_service;
pub mod wizard_service;
