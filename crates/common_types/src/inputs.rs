//! Input objects accepted by the GraphQL API's queries and mutations.
//!
//! Every operation takes a single `data` argument with one of these shapes.
//! Required fields are enforced by GraphQL validation, so a request with a
//! missing or mistyped field never reaches the resolvers.

use async_graphql::InputObject;

use crate::Id;

/// Input arguments for querying a single User by Id.
#[derive(Clone, Debug, InputObject)]
pub struct UserByIdInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
}

/// Input arguments for querying a single User by Email.
#[derive(Clone, Debug, Default, InputObject)]
pub struct UserByEmailInput {
    pub email: Option<String>,
}

/// Input arguments for querying a single User by Username.
#[derive(Clone, Debug, Default, InputObject)]
pub struct UserByUsernameInput {
    pub username: Option<String>,
}

/// Input arguments for creating a User.
#[derive(Clone, Debug, InputObject)]
pub struct CreateUserInput {
    #[graphql(validator(email))]
    pub email: String,
    #[graphql(validator(min_length = 1))]
    pub username: Option<String>,
}

/// Input arguments for updating a User. Omitted fields keep their stored
/// value.
#[derive(Clone, Debug, InputObject)]
pub struct UpdateUserInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
    #[graphql(validator(email))]
    pub email: Option<String>,
    #[graphql(validator(min_length = 1))]
    pub username: Option<String>,
}

#[derive(Clone, Debug, InputObject)]
pub struct ProfileByIdInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
}

/// Input arguments for querying the Profile of a specific User.
#[derive(Clone, Debug, InputObject)]
pub struct ProfileByUserIdInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
}

#[derive(Clone, Debug, InputObject)]
pub struct CreateProfileInput {
    #[graphql(validator(min_length = 1))]
    pub user_id: Id,
    pub bio: String,
}

#[derive(Clone, Debug, InputObject)]
pub struct UpdateProfileInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
    pub bio: Option<String>,
}

/// Input arguments for querying a single Blog by Id.
#[derive(Clone, Debug, InputObject)]
pub struct BlogByIdInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
}

/// Input arguments for querying Blogs by User Id. Search for the Blogs of a
/// specific User.
#[derive(Clone, Debug, InputObject)]
pub struct BlogsByUserIdInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
}

/// Input arguments for creating a Blog.
#[derive(Clone, Debug, InputObject)]
pub struct CreateBlogInput {
    #[graphql(validator(min_length = 1))]
    pub author_id: Id,
    pub name: String,
    pub description: String,
}

/// Input arguments for updating a Blog. Omitted fields keep their stored
/// value.
#[derive(Clone, Debug, InputObject)]
pub struct UpdateBlogInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, InputObject)]
pub struct BlogPostByIdInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
}

/// Input arguments for querying BlogPosts by a User Id. Search for the
/// BlogPosts of a specific User.
#[derive(Clone, Debug, InputObject)]
pub struct BlogPostsByUserIdInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
}

/// Input arguments for querying BlogPosts by Blog Id.
#[derive(Clone, Debug, InputObject)]
pub struct BlogPostsByBlogIdInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
}

#[derive(Clone, Debug, InputObject)]
pub struct CreateBlogPostInput {
    #[graphql(validator(min_length = 1))]
    pub author_id: Id,
    #[graphql(validator(min_length = 1))]
    pub blog_id: Id,
    pub title: String,
    pub content: String,
    /// New posts are drafts unless stated otherwise.
    #[graphql(default = false)]
    pub published: bool,
}

#[derive(Clone, Debug, InputObject)]
pub struct UpdateBlogPostInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

#[derive(Clone, Debug, InputObject)]
pub struct BlogCommentByIdInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
}

/// Input arguments for querying BlogComments by User Id. Search for
/// BlogComments of a specific User.
#[derive(Clone, Debug, InputObject)]
pub struct BlogCommentsByUserIdInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
}

/// Input arguments for querying BlogComments by BlogPost Id. Search for the
/// BlogComments of a specific BlogPost.
#[derive(Clone, Debug, InputObject)]
pub struct BlogCommentsByPostIdInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
}

/// Input arguments for querying BlogComments by their Parent BlogComment Id.
/// Search for the BlogComments that replied to a specific BlogComment.
#[derive(Clone, Debug, InputObject)]
pub struct BlogCommentsByParentCommentIdInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
}

/// Input arguments for creating a BlogComment. Leave `parentId` empty for a
/// top-level comment, or set it to reply to another comment.
#[derive(Clone, Debug, InputObject)]
pub struct CreateBlogCommentInput {
    #[graphql(validator(min_length = 1))]
    pub author_id: Id,
    #[graphql(validator(min_length = 1))]
    pub blog_post_id: Id,
    pub content: String,
    #[graphql(validator(min_length = 1))]
    pub parent_id: Option<Id>,
}

#[derive(Clone, Debug, InputObject)]
pub struct UpdateBlogCommentInput {
    #[graphql(validator(min_length = 1))]
    pub id: Id,
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use async_graphql::{value, InputType};

    use super::*;

    #[test]
    fn published_defaults_to_false() {
        let input = CreateBlogPostInput::parse(Some(value!({
            "authorId": "u1",
            "blogId": "b1",
            "title": "Hello",
            "content": "World",
        })))
        .unwrap();

        assert!(!input.published);
        assert_eq!(input.blog_id, "b1");
    }

    #[test]
    fn update_fields_are_optional() {
        let input = UpdateBlogInput::parse(Some(value!({
            "id": "b1",
            "description": "x",
        })))
        .unwrap();

        assert_eq!(input.name, None);
        assert_eq!(input.description.as_deref(), Some("x"));
    }
}
