use std::sync::Arc;

use tracing::info;

use super::{non_empty, required, ManagerError, ManagerResult};
use crate::conversion::{
    apply_ticket_update, ticket_from_input, ticket_view_with_buyer,
    ticket_view_with_buyer_and_event, ticket_view_with_event, ConversionError,
};
use crate::inputs::TicketInput;
use crate::models::{Ticket, TicketKey};
use crate::store::{TicketFilter, TicketIncludes, TicketStore};
use crate::validation::{validate_ticket, WriteMode};
use crate::views::TicketView;

type Projection = fn(&Ticket) -> Result<TicketView, ConversionError>;

const WITH_BUYER: TicketIncludes = TicketIncludes {
    buyer: true,
    event: false,
};
const WITH_EVENT: TicketIncludes = TicketIncludes {
    buyer: false,
    event: true,
};
const WITH_BOTH: TicketIncludes = TicketIncludes {
    buyer: true,
    event: true,
};

fn bare(ticket: &Ticket) -> Result<TicketView, ConversionError> {
    Ok(TicketView::from(ticket))
}

#[derive(Clone)]
pub struct TicketManager {
    store: Arc<dyn TicketStore>,
}

impl TicketManager {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }

    pub async fn get_by_id(&self, key: &TicketKey) -> ManagerResult<TicketView> {
        self.find_view(key)
            .await
            .inspect_err(|e| e.log("ticket.get_by_id"))
    }

    async fn find_view(&self, key: &TicketKey) -> ManagerResult<TicketView> {
        if !key.is_complete() {
            return Err(ManagerError::user("The Ticket's Id is required"));
        }
        let ticket = self
            .store
            .find(key, WITH_BOTH)
            .await?
            .ok_or_else(|| ManagerError::not_found("Ticket not found"))?;
        Ok(ticket_view_with_buyer_and_event(&ticket)?)
    }

    pub async fn get_all(&self) -> ManagerResult<Vec<TicketView>> {
        self.list_views(TicketFilter::All, TicketIncludes::default(), bare)
            .await
            .inspect_err(|e| e.log("ticket.get_all"))
    }

    pub async fn get_by_buyer(&self, user_id: &str) -> ManagerResult<Vec<TicketView>> {
        self.buyer_views(user_id)
            .await
            .inspect_err(|e| e.log("ticket.get_by_buyer"))
    }

    async fn buyer_views(&self, user_id: &str) -> ManagerResult<Vec<TicketView>> {
        required(user_id, "The UserId is required")?;
        self.list_views(
            TicketFilter::Buyer(user_id.to_string()),
            WITH_EVENT,
            ticket_view_with_event,
        )
        .await
    }

    pub async fn get_by_buyer_and_event(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> ManagerResult<Vec<TicketView>> {
        self.buyer_event_views(user_id, event_id)
            .await
            .inspect_err(|e| e.log("ticket.get_by_buyer_and_event"))
    }

    async fn buyer_event_views(
        &self,
        user_id: &str,
        event_id: &str,
    ) -> ManagerResult<Vec<TicketView>> {
        required(user_id, "The UserId is required")?;
        required(event_id, "The EventId is required")?;
        self.list_views(
            TicketFilter::BuyerAndEvent {
                user_id: user_id.to_string(),
                event_id: event_id.to_string(),
            },
            WITH_EVENT,
            ticket_view_with_event,
        )
        .await
    }

    pub async fn get_sold_by_organizer(
        &self,
        organizer_id: &str,
    ) -> ManagerResult<Vec<TicketView>> {
        self.organizer_views(organizer_id)
            .await
            .inspect_err(|e| e.log("ticket.get_sold_by_organizer"))
    }

    async fn organizer_views(&self, organizer_id: &str) -> ManagerResult<Vec<TicketView>> {
        required(organizer_id, "The OrganizerId is required")?;
        self.list_views(
            TicketFilter::SoldByOrganizer(organizer_id.to_string()),
            WITH_EVENT,
            ticket_view_with_event,
        )
        .await
    }

    pub async fn get_by_event(&self, event_id: &str) -> ManagerResult<Vec<TicketView>> {
        self.event_views(event_id)
            .await
            .inspect_err(|e| e.log("ticket.get_by_event"))
    }

    async fn event_views(&self, event_id: &str) -> ManagerResult<Vec<TicketView>> {
        required(event_id, "The EventId is required")?;
        self.list_views(
            TicketFilter::Event(event_id.to_string()),
            WITH_BUYER,
            ticket_view_with_buyer,
        )
        .await
    }

    async fn list_views(
        &self,
        filter: TicketFilter,
        includes: TicketIncludes,
        project: Projection,
    ) -> ManagerResult<Vec<TicketView>> {
        let tickets = self.store.list(filter, includes).await?;
        let views = tickets
            .iter()
            .map(project)
            .collect::<Result<Vec<_>, _>>()?;
        non_empty(views, "Tickets not found")
    }

    pub async fn create(&self, input: &TicketInput) -> ManagerResult<()> {
        self.try_create(input)
            .await
            .inspect_err(|e| e.log("ticket.create"))
    }

    async fn try_create(&self, input: &TicketInput) -> ManagerResult<()> {
        validate_ticket(input, WriteMode::Create)?;
        let ticket = ticket_from_input(input);
        self.store.create(&ticket).await?;
        info!(
            user_id = %ticket.user_id,
            event_id = %ticket.event_id,
            auxiliary_id = %ticket.auxiliary_id,
            "Ticket created"
        );
        Ok(())
    }

    pub async fn update(&self, input: &TicketInput) -> ManagerResult<()> {
        self.try_update(input)
            .await
            .inspect_err(|e| e.log("ticket.update"))
    }

    async fn try_update(&self, input: &TicketInput) -> ManagerResult<()> {
        validate_ticket(input, WriteMode::Edit)?;
        let key = TicketKey::new(&input.user_id, &input.event_id, &input.auxiliary_id);
        let mut ticket = self
            .store
            .find(&key, TicketIncludes::default())
            .await?
            .ok_or_else(|| ManagerError::user("The Ticket doesn't exist."))?;

        apply_ticket_update(&mut ticket, input);
        self.store.update(&ticket).await?;
        info!(auxiliary_id = %key.auxiliary_id, "Ticket updated");
        Ok(())
    }

    pub async fn delete(&self, key: &TicketKey) -> ManagerResult<()> {
        self.try_delete(key)
            .await
            .inspect_err(|e| e.log("ticket.delete"))
    }

    async fn try_delete(&self, key: &TicketKey) -> ManagerResult<()> {
        if !key.is_complete() {
            return Err(ManagerError::user("Ticket Id is required"));
        }
        let ticket = self
            .store
            .find(key, TicketIncludes::default())
            .await?
            .ok_or_else(|| ManagerError::user("Ticket doesn't exist"))?;
        self.store.delete(&ticket).await?;
        info!(auxiliary_id = %key.auxiliary_id, "Ticket deleted");
        Ok(())
    }
}
