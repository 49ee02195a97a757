use async_graphql::{Context, ErrorExtensions, Object, Result};
use blogql_common_types::inputs;
use blogql_store::entity::{
    BlogColumn, BlogCommentColumn, BlogPostColumn, ProfileColumn, UserColumn,
};
use blogql_store::{models, Entity, Filter, StoreError};
use tracing::info;

use super::{api_types, ctx_data, ApiSchemaContext};
use crate::errors::ApiError;

fn collaborator(operation: &'static str) -> impl FnOnce(StoreError) -> async_graphql::Error {
    move |err| ApiError::collaborator(operation, err).extend()
}

async fn all<E, T>(ctx: &ApiSchemaContext, operation: &'static str) -> Result<Vec<T>>
where
    E: Entity,
    T: From<E>,
{
    let rows = E::store(ctx.store.as_ref())
        .find_many(None)
        .await
        .map_err(collaborator(operation))?;

    Ok(rows.into_iter().map(Into::into).collect())
}

async fn by_id<E, T>(ctx: &ApiSchemaContext, operation: &'static str, id: &str) -> Result<Option<T>>
where
    E: Entity,
    T: From<E>,
{
    let row = E::store(ctx.store.as_ref())
        .get_by_id(id)
        .await
        .map_err(collaborator(operation))?;

    Ok(row.map(Into::into))
}

async fn by_column<E, T>(
    ctx: &ApiSchemaContext,
    operation: &'static str,
    column: E::Column,
    value: String,
) -> Result<Vec<T>>
where
    E: Entity,
    T: From<E>,
{
    let rows = E::store(ctx.store.as_ref())
        .find_many(Some(Filter::eq(column, value)))
        .await
        .map_err(collaborator(operation))?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Looks up a record by a unique column.
async fn by_unique_column<E, T>(
    ctx: &ApiSchemaContext,
    operation: &'static str,
    column: E::Column,
    value: String,
) -> Result<Option<T>>
where
    E: Entity,
    T: From<E>,
{
    let mut rows = by_column::<E, T>(ctx, operation, column, value).await?;

    if rows.len() > 1 {
        return Err(ApiError::InvariantViolation(format!(
            "{}: {} {} is not unique",
            operation,
            E::SCHEMA.name,
            column
        ))
        .extend());
    }
    Ok(rows.pop())
}

async fn create<E, T>(ctx: &ApiSchemaContext, operation: &'static str, new: E::New) -> Result<T>
where
    E: Entity,
    T: From<E>,
{
    let row = E::store(ctx.store.as_ref())
        .create(new)
        .await
        .map_err(collaborator(operation))?;

    info!(operation, id = row.id(), "Created {}", E::SCHEMA.name);
    Ok(row.into())
}

async fn update<E, T>(
    ctx: &ApiSchemaContext,
    operation: &'static str,
    id: &str,
    changes: E::Changes,
) -> Result<T>
where
    E: Entity,
    T: From<E>,
{
    let row = E::store(ctx.store.as_ref())
        .update(id, changes)
        .await
        .map_err(collaborator(operation))?;

    info!(operation, id, "Updated {}", E::SCHEMA.name);
    Ok(row.into())
}

fn required<T>(value: Option<T>, message: &str) -> Result<T> {
    value.ok_or_else(|| ApiError::Validation(message.to_string()).extend())
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Fetches all users, oldest first.
    async fn all_users(&self, ctx: &Context<'_>) -> Result<Vec<api_types::User>> {
        all::<models::User, _>(ctx_data(ctx), "allUsers").await
    }

    /// Fetches a single user by id. Returns null if there's no such user.
    async fn user_by_id(
        &self,
        ctx: &Context<'_>,
        data: inputs::UserByIdInput,
    ) -> Result<Option<api_types::User>> {
        by_id::<models::User, _>(ctx_data(ctx), "userById", &data.id).await
    }

    /// Fetches a single user by email address.
    async fn user_by_email(
        &self,
        ctx: &Context<'_>,
        data: Option<inputs::UserByEmailInput>,
    ) -> Result<Option<api_types::User>> {
        let email = required(
            data.and_then(|data| data.email),
            "userByEmail requires an email",
        )?;
        by_unique_column::<models::User, _>(ctx_data(ctx), "userByEmail", UserColumn::Email, email)
            .await
    }

    /// Fetches a single user by username.
    async fn user_by_username(
        &self,
        ctx: &Context<'_>,
        data: Option<inputs::UserByUsernameInput>,
    ) -> Result<Option<api_types::User>> {
        let username = required(
            data.and_then(|data| data.username),
            "userByUsername requires a username",
        )?;
        by_unique_column::<models::User, _>(
            ctx_data(ctx),
            "userByUsername",
            UserColumn::Username,
            username,
        )
        .await
    }

    async fn all_profiles(&self, ctx: &Context<'_>) -> Result<Vec<api_types::Profile>> {
        all::<models::Profile, _>(ctx_data(ctx), "allProfiles").await
    }

    async fn profile_by_id(
        &self,
        ctx: &Context<'_>,
        data: inputs::ProfileByIdInput,
    ) -> Result<Option<api_types::Profile>> {
        by_id::<models::Profile, _>(ctx_data(ctx), "profileById", &data.id).await
    }

    /// Fetches the profile of the user with the given id.
    async fn profile_by_user_id(
        &self,
        ctx: &Context<'_>,
        data: inputs::ProfileByUserIdInput,
    ) -> Result<Option<api_types::Profile>> {
        by_unique_column::<models::Profile, _>(
            ctx_data(ctx),
            "profileByUserId",
            ProfileColumn::UserId,
            data.id,
        )
        .await
    }

    async fn all_blogs(&self, ctx: &Context<'_>) -> Result<Vec<api_types::Blog>> {
        all::<models::Blog, _>(ctx_data(ctx), "allBlogs").await
    }

    async fn blog_by_id(
        &self,
        ctx: &Context<'_>,
        data: inputs::BlogByIdInput,
    ) -> Result<Option<api_types::Blog>> {
        by_id::<models::Blog, _>(ctx_data(ctx), "blogById", &data.id).await
    }

    /// Fetches all blogs authored by the user with the given id.
    async fn blogs_by_user_id(
        &self,
        ctx: &Context<'_>,
        data: inputs::BlogsByUserIdInput,
    ) -> Result<Vec<api_types::Blog>> {
        by_column::<models::Blog, _>(ctx_data(ctx), "blogsByUserId", BlogColumn::AuthorId, data.id)
            .await
    }

    async fn all_blog_posts(&self, ctx: &Context<'_>) -> Result<Vec<api_types::BlogPost>> {
        all::<models::BlogPost, _>(ctx_data(ctx), "allBlogPosts").await
    }

    async fn blog_post_by_id(
        &self,
        ctx: &Context<'_>,
        data: inputs::BlogPostByIdInput,
    ) -> Result<Option<api_types::BlogPost>> {
        by_id::<models::BlogPost, _>(ctx_data(ctx), "blogPostById", &data.id).await
    }

    /// Fetches all blog posts authored by the user with the given id.
    async fn blog_posts_by_user_id(
        &self,
        ctx: &Context<'_>,
        data: inputs::BlogPostsByUserIdInput,
    ) -> Result<Vec<api_types::BlogPost>> {
        by_column::<models::BlogPost, _>(
            ctx_data(ctx),
            "blogPostsByUserId",
            BlogPostColumn::AuthorId,
            data.id,
        )
        .await
    }

    /// Fetches all posts of the blog with the given id.
    async fn blog_posts_by_blog_id(
        &self,
        ctx: &Context<'_>,
        data: inputs::BlogPostsByBlogIdInput,
    ) -> Result<Vec<api_types::BlogPost>> {
        by_column::<models::BlogPost, _>(
            ctx_data(ctx),
            "blogPostsByBlogId",
            BlogPostColumn::BlogId,
            data.id,
        )
        .await
    }

    async fn all_blog_comments(&self, ctx: &Context<'_>) -> Result<Vec<api_types::BlogComment>> {
        all::<models::BlogComment, _>(ctx_data(ctx), "allBlogComments").await
    }

    async fn blog_comment_by_id(
        &self,
        ctx: &Context<'_>,
        data: inputs::BlogCommentByIdInput,
    ) -> Result<Option<api_types::BlogComment>> {
        by_id::<models::BlogComment, _>(ctx_data(ctx), "blogCommentById", &data.id).await
    }

    async fn blog_comments_by_user_id(
        &self,
        ctx: &Context<'_>,
        data: inputs::BlogCommentsByUserIdInput,
    ) -> Result<Vec<api_types::BlogComment>> {
        by_column::<models::BlogComment, _>(
            ctx_data(ctx),
            "blogCommentsByUserId",
            BlogCommentColumn::AuthorId,
            data.id,
        )
        .await
    }

    /// Fetches every comment on the post with the given id, replies
    /// included.
    async fn blog_comments_by_post_id(
        &self,
        ctx: &Context<'_>,
        data: inputs::BlogCommentsByPostIdInput,
    ) -> Result<Vec<api_types::BlogComment>> {
        by_column::<models::BlogComment, _>(
            ctx_data(ctx),
            "blogCommentsByPostId",
            BlogCommentColumn::BlogPostId,
            data.id,
        )
        .await
    }

    /// Fetches the direct replies to the comment with the given id.
    async fn blog_comments_by_parent_comment_id(
        &self,
        ctx: &Context<'_>,
        data: inputs::BlogCommentsByParentCommentIdInput,
    ) -> Result<Vec<api_types::BlogComment>> {
        by_column::<models::BlogComment, _>(
            ctx_data(ctx),
            "blogCommentsByParentCommentId",
            BlogCommentColumn::ParentId,
            data.id,
        )
        .await
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        data: inputs::CreateUserInput,
    ) -> Result<api_types::User> {
        create::<models::User, _>(ctx_data(ctx), "createUser", data.into()).await
    }

    /// Updates the supplied fields of a user. Omitted fields are left as they
    /// are.
    async fn update_user(
        &self,
        ctx: &Context<'_>,
        data: inputs::UpdateUserInput,
    ) -> Result<api_types::User> {
        let id = data.id.clone();
        update::<models::User, _>(ctx_data(ctx), "updateUser", &id, data.into()).await
    }

    async fn create_profile(
        &self,
        ctx: &Context<'_>,
        data: inputs::CreateProfileInput,
    ) -> Result<api_types::Profile> {
        create::<models::Profile, _>(ctx_data(ctx), "createProfile", data.into()).await
    }

    async fn update_profile(
        &self,
        ctx: &Context<'_>,
        data: inputs::UpdateProfileInput,
    ) -> Result<api_types::Profile> {
        let id = data.id.clone();
        update::<models::Profile, _>(ctx_data(ctx), "updateProfile", &id, data.into()).await
    }

    async fn create_blog(
        &self,
        ctx: &Context<'_>,
        data: inputs::CreateBlogInput,
    ) -> Result<api_types::Blog> {
        create::<models::Blog, _>(ctx_data(ctx), "createBlog", data.into()).await
    }

    async fn update_blog(
        &self,
        ctx: &Context<'_>,
        data: inputs::UpdateBlogInput,
    ) -> Result<api_types::Blog> {
        let id = data.id.clone();
        update::<models::Blog, _>(ctx_data(ctx), "updateBlog", &id, data.into()).await
    }

    /// Creates a blog post. Posts are unpublished unless stated otherwise.
    async fn create_blog_post(
        &self,
        ctx: &Context<'_>,
        data: inputs::CreateBlogPostInput,
    ) -> Result<api_types::BlogPost> {
        create::<models::BlogPost, _>(ctx_data(ctx), "createBlogPost", data.into()).await
    }

    async fn update_blog_post(
        &self,
        ctx: &Context<'_>,
        data: inputs::UpdateBlogPostInput,
    ) -> Result<api_types::BlogPost> {
        let id = data.id.clone();
        update::<models::BlogPost, _>(ctx_data(ctx), "updateBlogPost", &id, data.into()).await
    }

    /// Creates a comment, or a reply to another comment if `parentId` is set.
    async fn create_blog_comment(
        &self,
        ctx: &Context<'_>,
        data: inputs::CreateBlogCommentInput,
    ) -> Result<api_types::BlogComment> {
        create::<models::BlogComment, _>(ctx_data(ctx), "createBlogComment", data.into()).await
    }

    async fn update_blog_comment(
        &self,
        ctx: &Context<'_>,
        data: inputs::UpdateBlogCommentInput,
    ) -> Result<api_types::BlogComment> {
        let id = data.id.clone();
        update::<models::BlogComment, _>(ctx_data(ctx), "updateBlogComment", &id, data.into())
            .await
    }
}
