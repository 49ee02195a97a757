//! Declarative description of every entity: its scalar fields, its relational
//! fields and how each relation joins to its target.
//!
//! Nothing in here performs I/O. The GraphQL object types resolve exactly the
//! relations declared here, and the persistence layer filters on exactly the
//! [`Entity::Column`]s declared here.

use std::fmt;

use strum::{AsRefStr, Display, EnumIter};

use crate::models::{
    Blog, BlogChanges, BlogComment, BlogCommentChanges, BlogPost, BlogPostChanges, NewBlog,
    NewBlogComment, NewBlogPost, NewProfile, NewUser, Profile, ProfileChanges, User, UserChanges,
};
use crate::persistence::{EntityStore, Persistence};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Id,
    String,
    Boolean,
    Int,
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarField {
    pub name: &'static str,
    pub ty: ScalarType,
    pub nullable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    OneNullable,
    OneRequired,
    Many,
}

/// How a relational field finds its target rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    /// The parent stores the target's id in the named field.
    LocalKey(&'static str),
    /// The target stores the parent's id in the named field.
    InverseKey(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationField {
    pub name: &'static str,
    pub target: &'static str,
    pub cardinality: Cardinality,
    pub join: Join,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    pub name: &'static str,
    pub scalars: &'static [ScalarField],
    pub relations: &'static [RelationField],
}

impl EntitySchema {
    pub fn scalar(&self, name: &str) -> Option<&ScalarField> {
        self.scalars.iter().find(|field| field.name == name)
    }

    pub fn relation(&self, name: &str) -> Option<&RelationField> {
        self.relations.iter().find(|field| field.name == name)
    }
}

/// A record type owned by the persistence layer.
pub trait Entity: Clone + fmt::Debug + Send + Sync + 'static {
    const SCHEMA: EntitySchema;

    /// Columns that `find_many` can filter on.
    type Column: Copy + fmt::Debug + fmt::Display + Send + Sync + 'static;
    /// Payload for creating a record. Ids and timestamps are assigned by the
    /// store.
    type New: fmt::Debug + Send + Sync + 'static;
    /// Partial update payload; unset fields keep their stored value.
    type Changes: fmt::Debug + Send + Sync + 'static;

    fn id(&self) -> &str;

    /// The value of a filterable column, `None` if the column is nullable and
    /// unset.
    fn column(&self, column: Self::Column) -> Option<&str>;

    /// Picks the store for this entity type out of a [`Persistence`] bundle.
    fn store(persistence: &dyn Persistence) -> &dyn EntityStore<Self>;
}

/// Schemas of all entity types, in dependency order.
pub fn schemas() -> [EntitySchema; 5] {
    [
        User::SCHEMA,
        Profile::SCHEMA,
        Blog::SCHEMA,
        BlogPost::SCHEMA,
        BlogComment::SCHEMA,
    ]
}

const fn scalar(name: &'static str, ty: ScalarType, nullable: bool) -> ScalarField {
    ScalarField { name, ty, nullable }
}

const fn relation(
    name: &'static str,
    target: &'static str,
    cardinality: Cardinality,
    join: Join,
) -> RelationField {
    RelationField {
        name,
        target,
        cardinality,
        join,
    }
}

const ID: ScalarField = scalar("id", ScalarType::Id, false);
const CREATED_AT: ScalarField = scalar("createdAt", ScalarType::Timestamp, false);
const UPDATED_AT: ScalarField = scalar("updatedAt", ScalarType::Timestamp, false);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum UserColumn {
    Email,
    Username,
}

impl Entity for User {
    const SCHEMA: EntitySchema = EntitySchema {
        name: "User",
        scalars: &[
            ID,
            CREATED_AT,
            UPDATED_AT,
            scalar("username", ScalarType::String, true),
            scalar("email", ScalarType::String, false),
        ],
        relations: &[
            relation(
                "profile",
                "Profile",
                Cardinality::OneNullable,
                Join::InverseKey("userId"),
            ),
            relation("blogs", "Blog", Cardinality::Many, Join::InverseKey("authorId")),
            relation(
                "blogPosts",
                "BlogPost",
                Cardinality::Many,
                Join::InverseKey("authorId"),
            ),
            relation(
                "blogComments",
                "BlogComment",
                Cardinality::Many,
                Join::InverseKey("authorId"),
            ),
        ],
    };

    type Column = UserColumn;
    type New = NewUser;
    type Changes = UserChanges;

    fn id(&self) -> &str {
        &self.id
    }

    fn column(&self, column: UserColumn) -> Option<&str> {
        match column {
            UserColumn::Email => Some(&self.email),
            UserColumn::Username => self.username.as_deref(),
        }
    }

    fn store(persistence: &dyn Persistence) -> &dyn EntityStore<Self> {
        persistence.users()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum ProfileColumn {
    UserId,
}

impl Entity for Profile {
    const SCHEMA: EntitySchema = EntitySchema {
        name: "Profile",
        scalars: &[
            ID,
            CREATED_AT,
            UPDATED_AT,
            scalar("userId", ScalarType::Id, false),
            scalar("bio", ScalarType::String, false),
        ],
        relations: &[relation(
            "user",
            "User",
            Cardinality::OneRequired,
            Join::LocalKey("userId"),
        )],
    };

    type Column = ProfileColumn;
    type New = NewProfile;
    type Changes = ProfileChanges;

    fn id(&self) -> &str {
        &self.id
    }

    fn column(&self, column: ProfileColumn) -> Option<&str> {
        match column {
            ProfileColumn::UserId => Some(&self.user_id),
        }
    }

    fn store(persistence: &dyn Persistence) -> &dyn EntityStore<Self> {
        persistence.profiles()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum BlogColumn {
    AuthorId,
}

impl Entity for Blog {
    const SCHEMA: EntitySchema = EntitySchema {
        name: "Blog",
        scalars: &[
            ID,
            CREATED_AT,
            UPDATED_AT,
            scalar("authorId", ScalarType::Id, false),
            scalar("name", ScalarType::String, false),
            scalar("description", ScalarType::String, false),
        ],
        relations: &[
            relation(
                "author",
                "User",
                Cardinality::OneRequired,
                Join::LocalKey("authorId"),
            ),
            relation(
                "blogPosts",
                "BlogPost",
                Cardinality::Many,
                Join::InverseKey("blogId"),
            ),
        ],
    };

    type Column = BlogColumn;
    type New = NewBlog;
    type Changes = BlogChanges;

    fn id(&self) -> &str {
        &self.id
    }

    fn column(&self, column: BlogColumn) -> Option<&str> {
        match column {
            BlogColumn::AuthorId => Some(&self.author_id),
        }
    }

    fn store(persistence: &dyn Persistence) -> &dyn EntityStore<Self> {
        persistence.blogs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum BlogPostColumn {
    AuthorId,
    BlogId,
}

impl Entity for BlogPost {
    const SCHEMA: EntitySchema = EntitySchema {
        name: "BlogPost",
        scalars: &[
            ID,
            CREATED_AT,
            UPDATED_AT,
            scalar("authorId", ScalarType::Id, false),
            scalar("blogId", ScalarType::Id, false),
            scalar("title", ScalarType::String, false),
            scalar("content", ScalarType::String, false),
            scalar("published", ScalarType::Boolean, false),
        ],
        relations: &[
            relation(
                "author",
                "User",
                Cardinality::OneRequired,
                Join::LocalKey("authorId"),
            ),
            relation(
                "blog",
                "Blog",
                Cardinality::OneRequired,
                Join::LocalKey("blogId"),
            ),
            relation(
                "blogComments",
                "BlogComment",
                Cardinality::Many,
                Join::InverseKey("blogPostId"),
            ),
        ],
    };

    type Column = BlogPostColumn;
    type New = NewBlogPost;
    type Changes = BlogPostChanges;

    fn id(&self) -> &str {
        &self.id
    }

    fn column(&self, column: BlogPostColumn) -> Option<&str> {
        match column {
            BlogPostColumn::AuthorId => Some(&self.author_id),
            BlogPostColumn::BlogId => Some(&self.blog_id),
        }
    }

    fn store(persistence: &dyn Persistence) -> &dyn EntityStore<Self> {
        persistence.blog_posts()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum BlogCommentColumn {
    AuthorId,
    BlogPostId,
    ParentId,
}

impl Entity for BlogComment {
    const SCHEMA: EntitySchema = EntitySchema {
        name: "BlogComment",
        scalars: &[
            ID,
            CREATED_AT,
            UPDATED_AT,
            scalar("authorId", ScalarType::Id, false),
            scalar("blogPostId", ScalarType::Id, false),
            scalar("parentId", ScalarType::Id, true),
            scalar("content", ScalarType::String, false),
        ],
        relations: &[
            relation(
                "author",
                "User",
                Cardinality::OneRequired,
                Join::LocalKey("authorId"),
            ),
            relation(
                "blogPost",
                "BlogPost",
                Cardinality::OneRequired,
                Join::LocalKey("blogPostId"),
            ),
            relation(
                "parent",
                "BlogComment",
                Cardinality::OneNullable,
                Join::LocalKey("parentId"),
            ),
            relation(
                "blogComments",
                "BlogComment",
                Cardinality::Many,
                Join::InverseKey("parentId"),
            ),
        ],
    };

    type Column = BlogCommentColumn;
    type New = NewBlogComment;
    type Changes = BlogCommentChanges;

    fn id(&self) -> &str {
        &self.id
    }

    fn column(&self, column: BlogCommentColumn) -> Option<&str> {
        match column {
            BlogCommentColumn::AuthorId => Some(&self.author_id),
            BlogCommentColumn::BlogPostId => Some(&self.blog_post_id),
            BlogCommentColumn::ParentId => self.parent_id.as_deref(),
        }
    }

    fn store(persistence: &dyn Persistence) -> &dyn EntityStore<Self> {
        persistence.blog_comments()
    }
}
