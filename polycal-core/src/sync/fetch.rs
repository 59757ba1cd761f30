use crate::backend::{Backend, declined_by_owner, owner_emails};
use crate::error::PolycalResult;
use crate::event::Event;
use crate::window::SyncWindow;

/// Events in `window` that the calendar's owner has not declined.
pub async fn fetch_events<B: Backend>(
    backend: &B,
    calendar_id: &str,
    window: &SyncWindow,
) -> PolycalResult<Vec<Event>> {
    let records = backend.list_events(calendar_id, window).await?;
    let owners = owner_emails(calendar_id);
    let listed = records.len();

    let events = records
        .into_iter()
        .filter(|record| !declined_by_owner(record, &owners))
        .map(Event::try_from)
        .collect::<PolycalResult<Vec<_>>>()?;

    tracing::debug!(
        calendar = calendar_id,
        listed,
        declined = listed - events.len(),
        "fetched events"
    );
    Ok(events)
}
