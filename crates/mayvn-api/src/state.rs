//! Application state shared by all handlers

use mayvn_core::Config;
use mayvn_services::{AccountService, IdeaGenerator, InsightsAggregator};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub accounts: AccountService,
    pub insights: InsightsAggregator,
    pub ideas: IdeaGenerator,
}
