//! Support Desk
//!
//! Tickets walk an ordered chain of handlers until one accepts them.

use std::fmt;

use smallvec::SmallVec;
use tracing::debug;

/// A customer support ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportTicket {
    /// Problem description
    pub issue: String,

    /// 1 (basic) to 3 (hardware failure); anything else is out of scope for the desk
    pub severity: u8,
}

impl SupportTicket {
    /// Create a ticket.
    pub fn new(issue: impl Into<String>, severity: u8) -> Self {
        Self {
            issue: issue.into(),
            severity,
        }
    }
}

/// A link in the support chain.
pub trait SupportHandler: fmt::Debug {
    /// Handler name
    fn name(&self) -> &'static str;

    /// What the handler does with tickets it accepts, e.g. `Handling basic issue`.
    fn action(&self) -> &'static str;

    /// Whether this handler takes the ticket.
    fn can_handle(&self, ticket: &SupportTicket) -> bool;
}

/// First line: basic issues.
#[derive(Debug, Clone, Copy, Default)]
pub struct Level1Support;

impl SupportHandler for Level1Support {
    fn name(&self) -> &'static str {
        "Level 1 Support"
    }

    fn action(&self) -> &'static str {
        "Handling basic issue"
    }

    fn can_handle(&self, ticket: &SupportTicket) -> bool {
        ticket.severity == 1
    }
}

/// Second line: advanced software issues.
#[derive(Debug, Clone, Copy, Default)]
pub struct Level2Support;

impl SupportHandler for Level2Support {
    fn name(&self) -> &'static str {
        "Level 2 Support"
    }

    fn action(&self) -> &'static str {
        "Handling advanced software issue"
    }

    fn can_handle(&self, ticket: &SupportTicket) -> bool {
        ticket.severity == 2
    }
}

/// Last line: hardware failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardwareSpecialist;

impl SupportHandler for HardwareSpecialist {
    fn name(&self) -> &'static str {
        "Hardware Specialist"
    }

    fn action(&self) -> &'static str {
        "Handling complex hardware failure"
    }

    fn can_handle(&self, ticket: &SupportTicket) -> bool {
        ticket.severity == 3
    }
}

/// How a ticket was dealt with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Handler that took the ticket, if any
    pub handled_by: Option<&'static str>,

    /// What the handler did
    pub action: Option<&'static str>,

    /// Handlers the ticket passed through without being taken
    pub escalations: SmallVec<[&'static str; 4]>,
}

impl Resolution {
    /// Whether some handler took the ticket.
    pub fn is_resolved(&self) -> bool {
        self.handled_by.is_some()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.handled_by, self.action) {
            (Some(handler), Some(action)) => write!(f, "{handler}: {action}"),
            _ => f.write_str("Unresolved: consult manager"),
        }
    }
}

/// Ordered chain of support handlers.
#[derive(Debug)]
pub struct SupportDesk {
    chain: Vec<Box<dyn SupportHandler>>,
}

impl Default for SupportDesk {
    /// Level 1, then Level 2, then the hardware specialist.
    fn default() -> Self {
        Self::new(vec![
            Box::new(Level1Support),
            Box::new(Level2Support),
            Box::new(HardwareSpecialist),
        ])
    }
}

impl SupportDesk {
    /// Create a desk with handlers tried in the given order.
    pub fn new(chain: Vec<Box<dyn SupportHandler>>) -> Self {
        Self { chain }
    }

    /// Pass `ticket` along the chain until a handler accepts it.
    pub fn handle(&self, ticket: &SupportTicket) -> Resolution {
        let mut escalations = SmallVec::new();

        for handler in &self.chain {
            if handler.can_handle(ticket) {
                debug!(handler = handler.name(), issue = %ticket.issue, "ticket handled");

                return Resolution {
                    handled_by: Some(handler.name()),
                    action: Some(handler.action()),
                    escalations,
                };
            }

            debug!(handler = handler.name(), "escalating ticket");

            escalations.push(handler.name());
        }

        Resolution {
            handled_by: None,
            action: None,
            escalations,
        }
    }
}
