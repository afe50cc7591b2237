use std::sync::Arc;

use tracing::info;

use super::{non_empty, required, ManagerError, ManagerResult};
use crate::conversion::{
    apply_review_update, review_from_input, review_view_with_event, review_view_with_user,
    review_view_with_user_and_event, ConversionError,
};
use crate::inputs::ReviewInput;
use crate::models::{Review, ReviewKey};
use crate::store::{ReviewFilter, ReviewIncludes, ReviewStore};
use crate::validation::validate_review;
use crate::views::ReviewView;

type Projection = fn(&Review) -> Result<ReviewView, ConversionError>;

const WITH_USER: ReviewIncludes = ReviewIncludes {
    user: true,
    event: false,
};
const WITH_EVENT: ReviewIncludes = ReviewIncludes {
    user: false,
    event: true,
};
const WITH_BOTH: ReviewIncludes = ReviewIncludes {
    user: true,
    event: true,
};

fn bare(review: &Review) -> Result<ReviewView, ConversionError> {
    Ok(ReviewView::from(review))
}

#[derive(Clone)]
pub struct ReviewManager {
    store: Arc<dyn ReviewStore>,
}

impl ReviewManager {
    pub fn new(store: Arc<dyn ReviewStore>) -> Self {
        Self { store }
    }

    pub async fn get_by_id(&self, key: &ReviewKey) -> ManagerResult<ReviewView> {
        self.find_view(key)
            .await
            .inspect_err(|e| e.log("review.get_by_id"))
    }

    async fn find_view(&self, key: &ReviewKey) -> ManagerResult<ReviewView> {
        if !key.is_complete() {
            return Err(ManagerError::user("The Review's Id is required"));
        }
        let review = self
            .store
            .find(key, WITH_BOTH)
            .await?
            .ok_or_else(|| ManagerError::not_found("Review not found"))?;
        Ok(review_view_with_user_and_event(&review)?)
    }

    pub async fn get_all(&self) -> ManagerResult<Vec<ReviewView>> {
        self.list_views(ReviewFilter::All, ReviewIncludes::default(), bare)
            .await
            .inspect_err(|e| e.log("review.get_all"))
    }

    pub async fn get_by_author(&self, user_id: &str) -> ManagerResult<Vec<ReviewView>> {
        self.author_views(user_id)
            .await
            .inspect_err(|e| e.log("review.get_by_author"))
    }

    async fn author_views(&self, user_id: &str) -> ManagerResult<Vec<ReviewView>> {
        required(user_id, "The UserId is required")?;
        self.list_views(
            ReviewFilter::Author(user_id.to_string()),
            WITH_EVENT,
            review_view_with_event,
        )
        .await
    }

    pub async fn get_by_organizer(&self, organizer_id: &str) -> ManagerResult<Vec<ReviewView>> {
        self.organizer_views(organizer_id)
            .await
            .inspect_err(|e| e.log("review.get_by_organizer"))
    }

    async fn organizer_views(&self, organizer_id: &str) -> ManagerResult<Vec<ReviewView>> {
        required(organizer_id, "The OrganizerId is required")?;
        self.list_views(
            ReviewFilter::Organizer(organizer_id.to_string()),
            WITH_BOTH,
            review_view_with_user_and_event,
        )
        .await
    }

    pub async fn get_by_event(&self, event_id: &str) -> ManagerResult<Vec<ReviewView>> {
        self.event_views(event_id)
            .await
            .inspect_err(|e| e.log("review.get_by_event"))
    }

    async fn event_views(&self, event_id: &str) -> ManagerResult<Vec<ReviewView>> {
        required(event_id, "The EventId is required")?;
        self.list_views(
            ReviewFilter::Event(event_id.to_string()),
            WITH_USER,
            review_view_with_user,
        )
        .await
    }

    async fn list_views(
        &self,
        filter: ReviewFilter,
        includes: ReviewIncludes,
        project: Projection,
    ) -> ManagerResult<Vec<ReviewView>> {
        let reviews = self.store.list(filter, includes).await?;
        let views = reviews
            .iter()
            .map(project)
            .collect::<Result<Vec<_>, _>>()?;
        non_empty(views, "Reviews not found")
    }

    pub async fn create(&self, input: &ReviewInput) -> ManagerResult<()> {
        self.try_create(input)
            .await
            .inspect_err(|e| e.log("review.create"))
    }

    async fn try_create(&self, input: &ReviewInput) -> ManagerResult<()> {
        validate_review(input)?;
        let review = review_from_input(input);
        self.store.create(&review).await?;
        info!(user_id = %review.user_id, event_id = %review.event_id, "Review created");
        Ok(())
    }

    pub async fn update(&self, input: &ReviewInput) -> ManagerResult<()> {
        self.try_update(input)
            .await
            .inspect_err(|e| e.log("review.update"))
    }

    async fn try_update(&self, input: &ReviewInput) -> ManagerResult<()> {
        validate_review(input)?;
        let key = ReviewKey::new(&input.user_id, &input.event_id);
        let mut review = self
            .store
            .find(&key, ReviewIncludes::default())
            .await?
            .ok_or_else(|| ManagerError::user("The Review doesn't exist."))?;

        apply_review_update(&mut review, input);
        self.store.update(&review).await?;
        info!(user_id = %key.user_id, event_id = %key.event_id, "Review updated");
        Ok(())
    }

    pub async fn delete(&self, key: &ReviewKey) -> ManagerResult<()> {
        self.try_delete(key)
            .await
            .inspect_err(|e| e.log("review.delete"))
    }

    async fn try_delete(&self, key: &ReviewKey) -> ManagerResult<()> {
        if !key.is_complete() {
            return Err(ManagerError::user("Review Id is required"));
        }
        let review = self
            .store
            .find(key, ReviewIncludes::default())
            .await?
            .ok_or_else(|| ManagerError::user("Review doesn't exist"))?;
        self.store.delete(&review).await?;
        info!(user_id = %key.user_id, event_id = %key.event_id, "Review deleted");
        Ok(())
    }
}
