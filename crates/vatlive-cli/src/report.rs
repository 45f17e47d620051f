//! Plain-text pilot summary.

use vatlive_client::record::ActivePilot;

/// One human-readable line describing where `pilot` is and where it is
/// going.
pub fn summary_line(pilot: &ActivePilot) -> String {
  match &pilot.flight_plan {
    Some(plan) => format!(
      "{} departed from {} and is going to {} at current altitude {} connected to server {}",
      pilot.callsign,
      plan.departure,
      plan.arrival,
      pilot.position.altitude,
      pilot.server.ident,
    ),
    None => format!(
      "{} is at current altitude {} with no flight plan",
      pilot.callsign, pilot.position.altitude,
    ),
  }
}
