mod common;

use http::StatusCode;
use serde_json::json;

use common::{register, request, test_app, token_of, user_id_of};

#[tokio::test]
async fn test_feed_scenario() {
    let (app, _state) = test_app().await;

    // Ada and Lin register.
    let ada = register(&app, "Ada", "ada@x.com").await;
    let lin = register(&app, "Lin", "lin@x.com").await;
    let (ada_token, ada_id) = (token_of(&ada), user_id_of(&ada));
    let (lin_token, lin_id) = (token_of(&lin), user_id_of(&lin));

    // Lin posts "hello"; the author snapshot is Lin's profile at call time.
    let (status, post) = request(
        &app,
        "POST",
        "/api/posts",
        Some(&lin_token),
        Some(json!({"text": "hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["name"], "Lin");
    assert_eq!(post["user_id"], lin_id.as_str());

    // Ada sees Lin's post in the feed.
    let (status, feed) = request(&app, "GET", "/api/posts", Some(&ada_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let feed = feed.as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["text"], "hello");
    assert_eq!(feed[0]["name"], "Lin");

    // Ada follows Lin; the response is Ada's updated following list.
    let (status, following) = request(
        &app,
        "PUT",
        &format!("/api/users/follow/{}", lin_id),
        Some(&ada_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(following, json!([lin_id]));

    // Both sides of the edge are visible.
    let (status, lin_profile) = request(
        &app,
        "GET",
        &format!("/api/users/profile/{}", lin_id),
        Some(&ada_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lin_profile["followers"], json!([ada_id]));

    let (_, ada_me) = request(&app, "GET", "/api/auth/me", Some(&ada_token), None).await;
    assert_eq!(ada_me["following"], json!([lin_id]));
}

#[tokio::test]
async fn test_follow_error_cases() {
    let (app, _state) = test_app().await;

    let ada = register(&app, "Ada", "ada@x.com").await;
    let lin = register(&app, "Lin", "lin@x.com").await;
    let (ada_token, ada_id) = (token_of(&ada), user_id_of(&ada));
    let lin_id = user_id_of(&lin);

    let (status, _) = request(
        &app,
        "PUT",
        &format!("/api/users/follow/{}", lin_id),
        Some(&ada_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Repeated follow fails and leaves both lists unchanged.
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/api/users/follow/{}", lin_id),
        Some(&ada_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "User already followed");

    let (_, ada_me) = request(&app, "GET", "/api/auth/me", Some(&ada_token), None).await;
    assert_eq!(ada_me["following"], json!([lin_id]));
    let (_, lin_profile) = request(
        &app,
        "GET",
        &format!("/api/users/profile/{}", lin_id),
        Some(&ada_token),
        None,
    )
    .await;
    assert_eq!(lin_profile["followers"], json!([ada_id]));

    // Self-follow is blocked.
    let (status, _) = request(
        &app,
        "PUT",
        &format!("/api/users/follow/{}", ada_id),
        Some(&ada_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown target.
    let (status, body) = request(
        &app,
        "PUT",
        "/api/users/follow/no-such-user",
        Some(&ada_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "User not found");
}

#[tokio::test]
async fn test_suggestions_exclude_self_and_followed() {
    let (app, _state) = test_app().await;

    let ada = register(&app, "Ada", "ada@x.com").await;
    let lin = register(&app, "Lin", "lin@x.com").await;
    let kay = register(&app, "Kay", "kay@x.com").await;
    let ada_token = token_of(&ada);

    request(
        &app,
        "PUT",
        &format!("/api/users/follow/{}", user_id_of(&lin)),
        Some(&ada_token),
        None,
    )
    .await;

    let (status, suggestions) = request(
        &app,
        "GET",
        "/api/users/suggestions",
        Some(&ada_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let suggestions = suggestions.as_array().unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0]["id"], user_id_of(&kay).as_str());
    assert!(suggestions[0].get("password").is_none());
}

#[tokio::test]
async fn test_suggestions_are_bounded_to_five() {
    let (app, _state) = test_app().await;

    let ada = register(&app, "Ada", "ada@x.com").await;
    for i in 0..7 {
        register(&app, &format!("User{}", i), &format!("user{}@x.com", i)).await;
    }

    let (status, suggestions) = request(
        &app,
        "GET",
        "/api/users/suggestions",
        Some(&token_of(&ada)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(suggestions.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_like_toggle_is_idempotent_in_outcome() {
    let (app, _state) = test_app().await;

    let ada = register(&app, "Ada", "ada@x.com").await;
    let (ada_token, ada_id) = (token_of(&ada), user_id_of(&ada));

    let (_, post) = request(
        &app,
        "POST",
        "/api/posts",
        Some(&ada_token),
        Some(json!({"text": "hello"})),
    )
    .await;
    let post_id = post["id"].as_str().unwrap().to_string();
    let like_uri = format!("/api/posts/like/{}", post_id);

    // like -> one entry for Ada
    let (status, likes) = request(&app, "PUT", &like_uri, Some(&ada_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let likes = likes.as_array().unwrap().clone();
    assert_eq!(likes.len(), 1);
    assert_eq!(likes[0]["user_id"], ada_id.as_str());

    // unlike -> back to the original state
    let (_, likes) = request(&app, "PUT", &like_uri, Some(&ada_token), None).await;
    assert_eq!(likes.as_array().unwrap().len(), 0);

    // like again -> present again, still no duplicates
    let (_, likes) = request(&app, "PUT", &like_uri, Some(&ada_token), None).await;
    assert_eq!(likes.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_like_and_comment_on_missing_post_are_not_found() {
    let (app, _state) = test_app().await;

    let ada = register(&app, "Ada", "ada@x.com").await;
    let ada_token = token_of(&ada);

    let (status, body) = request(
        &app,
        "PUT",
        "/api/posts/like/no-such-post",
        Some(&ada_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Post not found");

    let (status, body) = request(
        &app,
        "POST",
        "/api/posts/comment/no-such-post",
        Some(&ada_token),
        Some(json!({"text": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Post not found");
}

#[tokio::test]
async fn test_comments_prepend_and_feed_order_is_by_creation_time() {
    let (app, _state) = test_app().await;

    let lin = register(&app, "Lin", "lin@x.com").await;
    let lin_token = token_of(&lin);

    let (_, first) = request(
        &app,
        "POST",
        "/api/posts",
        Some(&lin_token),
        Some(json!({"text": "first post"})),
    )
    .await;
    let (_, second) = request(
        &app,
        "POST",
        "/api/posts",
        Some(&lin_token),
        Some(json!({"text": "second post"})),
    )
    .await;
    let first_id = first["id"].as_str().unwrap().to_string();
    let second_id = second["id"].as_str().unwrap().to_string();

    // Comment twice on the older post; newest comment sits at the head.
    let comment_uri = format!("/api/posts/comment/{}", first_id);
    request(
        &app,
        "POST",
        &comment_uri,
        Some(&lin_token),
        Some(json!({"text": "earlier comment"})),
    )
    .await;
    let (status, comments) = request(
        &app,
        "POST",
        &comment_uri,
        Some(&lin_token),
        Some(json!({"text": "later comment"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let comments = comments.as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["text"], "later comment");
    assert_eq!(comments[1]["text"], "earlier comment");

    // Interactions never move a post: the feed is still newest-post-first.
    let (_, feed) = request(&app, "GET", "/api/posts", Some(&lin_token), None).await;
    let feed = feed.as_array().unwrap();
    assert_eq!(feed[0]["id"], second_id.as_str());
    assert_eq!(feed[1]["id"], first_id.as_str());
    assert_eq!(feed[1]["comments"][0]["text"], "later comment");
}

#[tokio::test]
async fn test_empty_post_text_rejected() {
    let (app, _state) = test_app().await;

    let ada = register(&app, "Ada", "ada@x.com").await;
    let (status, _) = request(
        &app,
        "POST",
        "/api/posts",
        Some(&token_of(&ada)),
        Some(json!({"text": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
