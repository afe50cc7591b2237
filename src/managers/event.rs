use std::sync::Arc;

use tracing::info;

use super::{non_empty, required, ManagerError, ManagerResult};
use crate::conversion::{apply_event_update, event_from_input, event_view_detailed};
use crate::inputs::{EventInput, PageInput, MAX_PAGE_LIMIT};
use crate::store::{EventFilter, EventIncludes, EventStore, Page};
use crate::validation::{validate_event, WriteMode};
use crate::views::EventView;

#[derive(Clone)]
pub struct EventManager {
    store: Arc<dyn EventStore>,
}

impl EventManager {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn get_by_id(&self, id: &str) -> ManagerResult<EventView> {
        self.find_view(id).await.inspect_err(|e| e.log("event.get_by_id"))
    }

    async fn find_view(&self, id: &str) -> ManagerResult<EventView> {
        required(id, "The Event's Id is required")?;
        let event = self
            .store
            .find(id, EventIncludes::organizer())
            .await?
            .ok_or_else(|| ManagerError::not_found("Event not found"))?;
        Ok(event_view_detailed(&event)?)
    }

    /// Most recently updated first.
    pub async fn get_page(&self, page: PageInput) -> ManagerResult<Vec<EventView>> {
        self.list_views(EventFilter::All, Some(page))
            .await
            .inspect_err(|e| e.log("event.get_page"))
    }

    pub async fn get_by_organizer(&self, organizer_id: &str) -> ManagerResult<Vec<EventView>> {
        self.organizer_views(organizer_id)
            .await
            .inspect_err(|e| e.log("event.get_by_organizer"))
    }

    async fn organizer_views(&self, organizer_id: &str) -> ManagerResult<Vec<EventView>> {
        required(organizer_id, "Organizer Id is required")?;
        self.list_views(EventFilter::Organizer(organizer_id.to_string()), None)
            .await
    }

    async fn list_views(
        &self,
        filter: EventFilter,
        page: Option<PageInput>,
    ) -> ManagerResult<Vec<EventView>> {
        let page = page.map(checked_page).transpose()?;
        let events = self
            .store
            .list(filter, page, EventIncludes::organizer())
            .await?;
        let views = events
            .iter()
            .map(event_view_detailed)
            .collect::<Result<Vec<_>, _>>()?;
        non_empty(views, "Events not found")
    }

    pub async fn create(&self, input: &EventInput) -> ManagerResult<()> {
        self.try_create(input)
            .await
            .inspect_err(|e| e.log("event.create"))
    }

    async fn try_create(&self, input: &EventInput) -> ManagerResult<()> {
        validate_event(input, WriteMode::Create)?;
        let event = event_from_input(input);
        self.store.create(&event).await?;
        info!(event_id = %event.id, organizer_id = %event.organizer_id, "Event created");
        Ok(())
    }

    pub async fn update(&self, input: &EventInput) -> ManagerResult<()> {
        self.try_update(input)
            .await
            .inspect_err(|e| e.log("event.update"))
    }

    async fn try_update(&self, input: &EventInput) -> ManagerResult<()> {
        validate_event(input, WriteMode::Edit)?;
        let mut event = self
            .store
            .find(&input.id, EventIncludes::default())
            .await?
            .ok_or_else(|| ManagerError::user("The Event doesn't exist."))?;

        let removed_guests = apply_event_update(&mut event, input);
        self.store.update(&event, &removed_guests).await?;
        info!(event_id = %event.id, removed_guests = removed_guests.len(), "Event updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> ManagerResult<()> {
        self.try_delete(id)
            .await
            .inspect_err(|e| e.log("event.delete"))
    }

    async fn try_delete(&self, id: &str) -> ManagerResult<()> {
        required(id, "Event Id is required")?;
        let event = self
            .store
            .find(id, EventIncludes::default())
            .await?
            .ok_or_else(|| ManagerError::user("Event doesn't exist"))?;
        self.store.delete(&event).await?;
        info!(event_id = %event.id, "Event deleted");
        Ok(())
    }
}

fn checked_page(page: PageInput) -> ManagerResult<Page> {
    if page.limit == 0 || page.limit > MAX_PAGE_LIMIT {
        return Err(ManagerError::user(format!(
            "Error: The Limit must be between 1 and {MAX_PAGE_LIMIT}."
        )));
    }
    Ok(Page {
        limit: page.limit as usize,
        offset: page.offset as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_limit_bounds() {
        assert!(checked_page(PageInput {
            limit: 0,
            offset: 0
        })
        .is_err());
        assert!(checked_page(PageInput {
            limit: 101,
            offset: 0
        })
        .is_err());
        assert_eq!(
            checked_page(PageInput {
                limit: 100,
                offset: 7
            }),
            Ok(Page {
                limit: 100,
                offset: 7
            })
        );
    }
}
