use serde::{Deserialize, Serialize};

use crate::model::{Client, Credit, Sale, StaffMember};

/// Everything the CLI records between runs
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct State {
    #[serde(default)]
    pub counter: Counter,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub staff: Vec<StaffMember>,
    #[serde(default)]
    pub credits: Vec<Credit>,
    #[serde(default)]
    pub sales: Vec<Sale>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Counter {
    pub last_credit: u32,
}

impl State {
    /// Look a credit up by id, then by code, case-insensitively
    pub fn credit_index(&self, reference: &str) -> Option<usize> {
        self.credits
            .iter()
            .position(|c| c.id.eq_ignore_ascii_case(reference))
            .or_else(|| self.credit_by_code(reference))
    }

    pub fn credit_by_code(&self, code: &str) -> Option<usize> {
        self.credits
            .iter()
            .position(|c| c.code.eq_ignore_ascii_case(code))
    }

    pub fn staff_index(&self, code: &str) -> Option<usize> {
        self.staff
            .iter()
            .position(|s| s.code.eq_ignore_ascii_case(code))
    }

    pub fn find_client(&self, name: &str) -> Option<&Client> {
        self.clients
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}
