//! Agents published on the SupplyGraph gateway
//!
//! Each agent is reachable through [`AgentClient::agent`] with its id; the
//! helpers here bind the well-known ones without spelling the id out.

use tower_service::Service;

use crate::{
    client::{agent::AgentClient, engine::TaskEngine},
    protocol::error::A2AError,
    service::{A2ARequest, A2AResponse},
};

/// US tariff calculation, which also performs customs (HS code) classification
pub const TARIFF_CALC: &str = "tariff_calc";

/// Supplier due diligence reports
pub const DUE_DILIGENCE_REPORT: &str = "due_diligence_report";

/// Geographic concentration and chokepoint analysis of a supply graph
pub const SG_CHOKEPOINT: &str = "sg_chokepoint";

/// Enterprise supply graph visualization
pub const SG_VISUALIZATION: &str = "sg_visualization";

/// Corporate exception reports
pub const CORPORATE_EXCEPTION_REPORT: &str = "corporate_exception_report";

/// Every well-known agent id
pub const ALL: [&str; 5] = [
    TARIFF_CALC,
    DUE_DILIGENCE_REPORT,
    SG_CHOKEPOINT,
    SG_VISUALIZATION,
    CORPORATE_EXCEPTION_REPORT,
];

impl<S> AgentClient<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError> + Clone + Send + 'static,
    S::Future: Send,
{
    /// US tariff calculation agent
    pub fn tariff_calculation(&self) -> TaskEngine<S> {
        self.agent(TARIFF_CALC)
    }

    /// Customs classification runs on the tariff calculation agent
    pub fn customs_classification(&self) -> TaskEngine<S> {
        self.agent(TARIFF_CALC)
    }

    pub fn supplier_due_diligence(&self) -> TaskEngine<S> {
        self.agent(DUE_DILIGENCE_REPORT)
    }

    pub fn geographic_concentration(&self) -> TaskEngine<S> {
        self.agent(SG_CHOKEPOINT)
    }

    pub fn supply_graph_visualization(&self) -> TaskEngine<S> {
        self.agent(SG_VISUALIZATION)
    }

    pub fn corporate_exception_report(&self) -> TaskEngine<S> {
        self.agent(CORPORATE_EXCEPTION_REPORT)
    }
}
