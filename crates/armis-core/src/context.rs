//! Request-scoped context passed explicitly into every dossier operation.
//!
//! The auth layer resolves the caller into a [`Viewer`]; the loader only ever
//! sees the target service number and whether the viewer may see it.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::record::ServiceNumber;

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
  pub username:       String,
  /// The viewer's own personnel record, if they have one.
  pub service_number: Option<ServiceNumber>,
  /// Administrators may view every record.
  pub admin:          bool,
}

impl Viewer {
  pub fn may_view(&self, target: &ServiceNumber) -> bool {
    self.admin || self.service_number.as_ref() == Some(target)
  }
}

/// Everything one dossier render needs from the enclosing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
  pub target:   ServiceNumber,
  pub may_view: bool,
  /// The date ages are computed against.
  pub today:    NaiveDate,
}

impl RequestContext {
  pub fn new(target: ServiceNumber, may_view: bool) -> Self {
    Self { target, may_view, today: Utc::now().date_naive() }
  }

  pub fn for_viewer(viewer: &Viewer, target: ServiceNumber) -> Self {
    let may_view = viewer.may_view(&target);
    Self::new(target, may_view)
  }

  /// Pin the date ages are computed against.
  pub fn on(mut self, today: NaiveDate) -> Self {
    self.today = today;
    self
  }
}
