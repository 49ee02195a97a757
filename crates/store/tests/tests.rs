//! These tests need a Docker daemon to run Postgres in.

mod common;

use blogql_store::entity::{BlogCommentColumn, BlogPostColumn};
use blogql_store::models::{
    Blog, BlogComment, BlogPost, BlogPostChanges, NewBlog, NewBlogComment, NewBlogPost, NewUser,
    User, UserChanges,
};
use blogql_store::{EntityStore, Filter, Persistence, StoreError};

use crate::common::TestDatabase;

#[tokio::test]
#[ignore = "requires Docker"]
async fn empty_store_has_no_users() {
    let store = TestDatabase::new().await.unwrap();
    let users: Vec<User> = store.users().find_many(None).await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn create_then_get_by_id() {
    let store = TestDatabase::new().await.unwrap();
    let user = store.author("ada@example.com").await;

    let found: Option<User> = store.users().get_by_id(&user.id).await.unwrap();
    assert_eq!(found.as_ref(), Some(&user));

    let missing: Option<User> = store.users().get_by_id("nonexistent").await.unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn duplicate_email_is_a_constraint_violation() {
    let store = TestDatabase::new().await.unwrap();
    store.author("ada@example.com").await;

    let res: Result<User, _> = store
        .users()
        .create(NewUser {
            email: "ada@example.com".to_string(),
            username: Some("ada".to_string()),
        })
        .await;
    assert!(matches!(res, Err(StoreError::Constraint(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn posts_filter_by_blog_in_insertion_order() {
    let store = TestDatabase::new().await.unwrap();
    let user = store.author("ada@example.com").await;

    let mut blogs = vec![];
    for name in ["first", "second"] {
        let blog: Blog = store
            .blogs()
            .create(NewBlog {
                author_id: user.id.clone(),
                name: name.to_string(),
                description: String::new(),
            })
            .await
            .unwrap();
        blogs.push(blog);
    }

    let mut expected = vec![];
    for (i, blog) in blogs.iter().cycle().take(6).enumerate() {
        let post: BlogPost = store
            .blog_posts()
            .create(NewBlogPost {
                author_id: user.id.clone(),
                blog_id: blog.id.clone(),
                title: format!("post {i}"),
                content: String::new(),
                published: false,
            })
            .await
            .unwrap();
        if blog.id == blogs[0].id {
            expected.push(post);
        }
    }

    let posts: Vec<BlogPost> = store
        .blog_posts()
        .find_many(Some(Filter::eq(BlogPostColumn::BlogId, blogs[0].id.clone())))
        .await
        .unwrap();
    assert_eq!(posts, expected);

    let ids: Vec<String> = expected.iter().map(|p| p.id.clone()).collect();
    let mut many: Vec<BlogPost> = store.blog_posts().get_many_by_ids(&ids).await.unwrap();
    many.sort_by(|a, b| a.title.cmp(&b.title));
    assert_eq!(many, expected);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn comment_threads() {
    let store = TestDatabase::new().await.unwrap();
    let user = store.author("ada@example.com").await;
    let blog: Blog = store
        .blogs()
        .create(NewBlog {
            author_id: user.id.clone(),
            name: "Notes".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();
    let post: BlogPost = store
        .blog_posts()
        .create(NewBlogPost {
            author_id: user.id.clone(),
            blog_id: blog.id.clone(),
            title: "Hello".to_string(),
            content: String::new(),
            published: true,
        })
        .await
        .unwrap();

    let top: BlogComment = store
        .blog_comments()
        .create(NewBlogComment {
            author_id: user.id.clone(),
            blog_post_id: post.id.clone(),
            parent_id: None,
            content: "top".to_string(),
        })
        .await
        .unwrap();
    let reply: BlogComment = store
        .blog_comments()
        .create(NewBlogComment {
            author_id: user.id.clone(),
            blog_post_id: post.id.clone(),
            parent_id: Some(top.id.clone()),
            content: "reply".to_string(),
        })
        .await
        .unwrap();

    let replies: Vec<BlogComment> = store
        .blog_comments()
        .find_many(Some(Filter::eq(BlogCommentColumn::ParentId, top.id.clone())))
        .await
        .unwrap();
    assert_eq!(replies, vec![reply]);

    let orphan: Result<BlogComment, _> = store
        .blog_comments()
        .create(NewBlogComment {
            author_id: user.id.clone(),
            blog_post_id: post.id.clone(),
            parent_id: Some("nonexistent".to_string()),
            content: "orphan".to_string(),
        })
        .await;
    assert!(matches!(orphan, Err(StoreError::Constraint(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn updates_merge_supplied_fields() {
    let store = TestDatabase::new().await.unwrap();
    let user = store.author("ada@example.com").await;

    let updated: User = store
        .users()
        .update(
            &user.id,
            UserChanges {
                username: Some("ada".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.username.as_deref(), Some("ada"));
    assert_eq!(updated.email, user.email);
    assert!(updated.updated_at >= user.updated_at);

    let missing: Result<BlogPost, _> = store
        .blog_posts()
        .update("nonexistent", BlogPostChanges::default())
        .await;
    assert!(matches!(missing, Err(StoreError::NotFound { .. })));
}
