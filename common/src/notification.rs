//! Notification kinds raised by business events.
//!
//! Each kind maps to the title shown at the top of the overlay popup and a
//! default body used when the caller supplies no detail text.

/// Kind of transient overlay.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NotificationKind {
    /// A walk was logged.
    WalkAdded,
    /// The walker was paid (full or manual cash-out).
    PaymentMade,
    /// Credit was given against the balance.
    CreditGiven,
    /// The weekly report went out.
    ReportSent,
    /// Bot lifecycle messages (starting, online, shutting down, errors).
    System,
}

impl NotificationKind {
    /// Popup title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::WalkAdded => "WALK ADDED",
            Self::PaymentMade => "PAYMENT MADE",
            Self::CreditGiven => "CREDIT GIVEN",
            Self::ReportSent => "REPORT SENT",
            Self::System => "NOTIFICATION",
        }
    }

    /// Body used when the detail text is empty.
    pub const fn default_detail(self) -> &'static str {
        match self {
            Self::WalkAdded => "New walk logged",
            Self::PaymentMade => "Balance paid out",
            Self::CreditGiven => "Credit recorded",
            Self::ReportSent => "Weekly report sent",
            Self::System => "",
        }
    }
}
