//! The four dashboard panels and the facade that submits them.
//!
//! Each panel turns a user-filled form into exactly one JSON-RPC call,
//! classifies the response and builds a view model. Transport failures are
//! folded into the view as a connection-error status; only bad input and
//! overlapping submissions surface as `Err`.

mod history;
mod problems;
mod trends;
mod users;

pub use history::HistoryView;
pub use problems::{ProblemRow, ProblemView};
pub use trends::{TrendRow, TrendView};
pub use users::{RegistrationView, UserForm};

use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::debug;

use crate::Result;
use crate::error::{Error, InputError};
use crate::types::ValueType;
use crate::util::time::datetime_local_to_unix;
use crate::zbx_client::{HistoryQuery, ZbxClient};

/// Item id plus a `datetime-local` range, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct ItemRangeForm {
    pub item_id: String,
    pub time_from: String,
    pub time_till: String,
    pub value_type: ValueType,
}

impl ItemRangeForm {
    /// # Errors
    ///
    /// Fails when the item id is blank or a bound is not a valid local date/time.
    pub fn to_query(&self) -> std::result::Result<HistoryQuery, InputError> {
        let item_id = self.item_id.trim();
        if item_id.is_empty() {
            return Err(InputError::Empty { field: "item id" });
        }
        Ok(HistoryQuery {
            item_id: item_id.to_string(),
            value_type: self.value_type,
            time_from: datetime_local_to_unix(&self.time_from)?,
            time_till: datetime_local_to_unix(&self.time_till)?,
        })
    }
}

/// Front door for all panels. Only one submission may be in flight at a
/// time; a second one is refused with [`Error::Busy`] rather than racing the
/// first for the output.
pub struct Dashboard {
    client: ZbxClient,
    in_flight: Semaphore,
}

impl Dashboard {
    pub fn new(client: ZbxClient) -> Self {
        Self {
            client,
            in_flight: Semaphore::new(1),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.available_permits() == 0
    }

    fn begin(&self, panel: &'static str) -> Result<SemaphorePermit<'_>> {
        let permit = self.in_flight.try_acquire().map_err(|_| {
            debug!(panel, "submission refused, another request is in flight");
            Error::Busy
        })?;
        Ok(permit)
    }
}
