//! Solutions, testimonials and client logos.

use std::sync::Arc;

use bazaar_commerce::content::{Client, Solution, Testimonial};
use bazaar_commerce::ids::{ClientId, SolutionId, TestimonialId};
use bazaar_commerce::CommerceError;
use bazaar_store::{Collection, Document, DocumentStore};

use crate::files::{FileStorage, Upload, UploadKind};
use crate::{RequestContext, ShopError, ShopResult};

/// Marketing content around the catalog.
#[derive(Clone)]
pub struct ContentService {
    solutions: Collection<Solution>,
    testimonials: Collection<Testimonial>,
    clients: Collection<Client>,
    files: Arc<dyn FileStorage>,
}

impl ContentService {
    pub fn new(store: Arc<dyn DocumentStore>, files: Arc<dyn FileStorage>) -> Self {
        Self {
            solutions: Collection::new(store.clone()),
            testimonials: Collection::new(store.clone()),
            clients: Collection::new(store),
            files,
        }
    }

    pub async fn list_solutions(&self) -> ShopResult<Vec<Solution>> {
        let mut solutions = self.solutions.all().await?;
        solutions.sort_by_key(|s| s.created_at);
        Ok(solutions)
    }

    /// Create a solution; the image is required.
    pub async fn create_solution(
        &self,
        ctx: &RequestContext,
        name: &str,
        image: Option<&Upload>,
    ) -> ShopResult<Solution> {
        ctx.require_admin()?;
        if name.trim().is_empty() {
            return Err(ShopError::validation("name", "is required"));
        }
        let image = image.ok_or_else(|| ShopError::validation("image", "is required"))?;
        let url = self.files.store(UploadKind::Image, image).await?;

        let solution = Solution::new(name, url)?;
        self.solutions.save(&solution).await?;
        tracing::info!(request_id = %ctx.request_id, solution_id = %solution.id, "Created solution");
        Ok(solution)
    }

    pub async fn delete_solution(&self, ctx: &RequestContext, id: &SolutionId) -> ShopResult<()> {
        ctx.require_admin()?;
        remove(ctx, &self.solutions, id.as_str(), || {
            CommerceError::SolutionNotFound(id.to_string())
        })
        .await
    }

    pub async fn list_testimonials(&self) -> ShopResult<Vec<Testimonial>> {
        let mut testimonials = self.testimonials.all().await?;
        testimonials.sort_by_key(|t| t.created_at);
        Ok(testimonials)
    }

    pub async fn create_testimonial(
        &self,
        ctx: &RequestContext,
        name: &str,
        review: &str,
        rating: f32,
    ) -> ShopResult<Testimonial> {
        ctx.require_admin()?;
        let testimonial = Testimonial::new(name, review, rating)?;
        self.testimonials.save(&testimonial).await?;
        tracing::info!(
            request_id = %ctx.request_id,
            testimonial_id = %testimonial.id,
            "Created testimonial"
        );
        Ok(testimonial)
    }

    pub async fn delete_testimonial(&self, ctx: &RequestContext, id: &TestimonialId) -> ShopResult<()> {
        ctx.require_admin()?;
        remove(ctx, &self.testimonials, id.as_str(), || {
            CommerceError::TestimonialNotFound(id.to_string())
        })
        .await
    }

    pub async fn list_clients(&self) -> ShopResult<Vec<Client>> {
        let mut clients = self.clients.all().await?;
        clients.sort_by_key(|c| c.created_at);
        Ok(clients)
    }

    /// Create a client; the logo is optional.
    pub async fn create_client(
        &self,
        ctx: &RequestContext,
        name: &str,
        logo: Option<&Upload>,
    ) -> ShopResult<Client> {
        ctx.require_admin()?;
        if name.trim().is_empty() {
            return Err(ShopError::validation("name", "is required"));
        }
        let logo_url = match logo {
            Some(upload) => Some(self.files.store(UploadKind::Image, upload).await?),
            None => None,
        };
        let client = Client::new(name, logo_url)?;
        self.clients.save(&client).await?;
        tracing::info!(request_id = %ctx.request_id, client_id = %client.id, "Created client");
        Ok(client)
    }

    pub async fn delete_client(&self, ctx: &RequestContext, id: &ClientId) -> ShopResult<()> {
        ctx.require_admin()?;
        remove(ctx, &self.clients, id.as_str(), || {
            CommerceError::ClientNotFound(id.to_string())
        })
        .await
    }
}

async fn remove<T: Document>(
    ctx: &RequestContext,
    collection: &Collection<T>,
    id: &str,
    not_found: impl FnOnce() -> CommerceError,
) -> ShopResult<()> {
    if !collection.remove(id).await? {
        return Err(not_found().into());
    }
    tracing::info!(
        request_id = %ctx.request_id,
        collection = T::COLLECTION,
        id,
        "Deleted content"
    );
    Ok(())
}
