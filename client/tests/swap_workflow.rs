//! Swap and redemption flows end to end over the recording fake backend

mod common;

use std::time::Duration;

use serde_json::json;
use shared::{
    Category, Condition, ItemFilters, ItemsResponse, NewItemFields, RespondAction, Size,
    SwapStatus, SwapType,
};

use client::app::queries::{self, item_key, items_key, swap_key};
use client::app::{AppEvent, Route, SwapAction, SwapIntent, SwapRequestOutcome, ToastLevel};
use client::cache::{QueryKey, QueryOptions, ResourceKind};
use client::core::error::{ApiError, AppError};

use common::{app_as, image, item, item_json, swap, user, FakeApi};

fn long_lived() -> QueryOptions {
    QueryOptions::default().stale_time(Duration::from_secs(300))
}

fn success_toasts(events: &[AppEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| e.toast_message(ToastLevel::Success))
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_points_redemption_sends_points_offer_and_invalidates_listing() {
    // Arrange
    let api = FakeApi::new();
    api.add_item(item("i1", "bob", 100));
    let app = app_as(&api, Some(user("alice", 150)));

    let listing_key = items_key(&ItemFilters::default());
    app.items_query(ItemFilters::default())
        .with_options(long_lived())
        .fetch(app.cache())
        .await
        .expect("listing fetch should succeed in test");
    assert!(!app.cache().state(&listing_key).expect("entry").is_stale);

    let target = app.item("i1").await.expect("item fetch should succeed in test");
    let form = app
        .swap_form(&target, SwapIntent::Redeem)
        .expect("logged in user should get a form");

    // Act
    let outcome = app
        .request_swap(&target, &form)
        .await
        .expect("redemption should succeed in test");

    // Assert
    assert!(matches!(outcome, SwapRequestOutcome::Requested(_)));
    let sent = api.calls_named("create_swap");
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].body,
        json!({
            "requestedItem": "i1",
            "message": "",
            "swapType": "points",
            "pointsOffered": 100,
        })
    );
    assert!(app.cache().state(&listing_key).expect("entry").is_stale);
    assert_eq!(
        success_toasts(&app.drain_events()),
        vec!["Swap request sent successfully!"]
    );
}

#[tokio::test]
async fn test_balance_equal_to_item_value_is_enough() {
    let api = FakeApi::new();
    api.add_item(item("i1", "bob", 100));
    let app = app_as(&api, Some(user("alice", 100)));
    let target = app.item("i1").await.expect("item fetch should succeed in test");

    let form = app
        .swap_form(&target, SwapIntent::Swap)
        .expect("logged in user should get a form");
    assert_eq!(form.swap_type, SwapType::Points);

    app.request_swap(&target, &form)
        .await
        .expect("exact balance should be accepted");
    assert_eq!(api.call_count("create_swap"), 1);
}

#[tokio::test]
async fn test_insufficient_points_blocks_request_without_network_call() {
    let api = FakeApi::new();
    api.add_item(item("i1", "bob", 100));
    let app = app_as(&api, Some(user("alice", 99)));
    let target = app.item("i1").await.expect("item fetch should succeed in test");

    let form = app
        .swap_form(&target, SwapIntent::Redeem)
        .expect("logged in user should get a form");
    let result = app.request_swap(&target, &form).await;

    match result {
        Err(AppError::Validation { field, message }) => {
            assert_eq!(field, "pointsOffered");
            assert_eq!(message, "Insufficient points balance");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(api.call_count("create_swap"), 0);
}

#[tokio::test]
async fn test_direct_swap_without_offered_items_is_blocked() {
    let api = FakeApi::new();
    api.add_item(item("i1", "bob", 100));
    let app = app_as(&api, Some(user("alice", 0)));
    let target = app.item("i1").await.expect("item fetch should succeed in test");

    let form = app
        .swap_form(&target, SwapIntent::Swap)
        .expect("logged in user should get a form");
    assert_eq!(form.swap_type, SwapType::Direct);

    let result = app.request_swap(&target, &form).await;

    assert!(matches!(
        result,
        Err(AppError::Validation { ref field, .. }) if field == "offeredItems"
    ));
    assert_eq!(api.call_count("create_swap"), 0);
}

#[tokio::test]
async fn test_unavailable_item_cannot_be_requested() {
    let api = FakeApi::new();
    let mut sold = item("i1", "bob", 100);
    sold.is_available = false;
    let app = app_as(&api, Some(user("alice", 500)));

    let form = app
        .swap_form(&sold, SwapIntent::Redeem)
        .expect("logged in user should get a form");
    let result = app.request_swap(&sold, &form).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_owner_redeem_deducts_points_and_delists_item() {
    // Arrange
    let api = FakeApi::new();
    api.add_item(item("i1", "bob", 100));
    api.add_item(item("i2", "carol", 40));
    let app = app_as(&api, Some(user("bob", 250)));

    let before = app
        .items(ItemFilters::default())
        .await
        .expect("listing fetch should succeed in test");
    assert_eq!(before.items.len(), 2);
    let own = app.item("i1").await.expect("item fetch should succeed in test");
    let form = app
        .swap_form(&own, SwapIntent::Redeem)
        .expect("logged in user should get a form");

    // Act
    let outcome = app
        .request_swap(&own, &form)
        .await
        .expect("owner redemption should succeed in test");

    // Assert
    assert_eq!(outcome, SwapRequestOutcome::Redeemed { points_deducted: 100 });
    assert_eq!(api.call_count("redeem_by_owner"), 1);
    assert_eq!(api.call_count("create_swap"), 0);
    assert_eq!(app.session().user().expect("still logged in").points, 150);

    let after = app
        .items(ItemFilters::default())
        .await
        .expect("listing refetch should succeed in test");
    let ids: Vec<&str> = after.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["i2"]);

    assert!(success_toasts(&app.drain_events())
        .contains(&"Item purchased successfully! 100 points deducted.".to_string()));
}

#[tokio::test]
async fn test_owner_cannot_request_swap_for_own_item() {
    let api = FakeApi::new();
    api.add_item(item("i1", "bob", 100));
    let app = app_as(&api, Some(user("bob", 250)));
    let own = app.item("i1").await.expect("item fetch should succeed in test");

    let form = app
        .swap_form(&own, SwapIntent::Swap)
        .expect("logged in user should get a form")
        .offering(["b2"]);
    let result = app.request_swap(&own, &form).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert_eq!(api.call_count("create_swap"), 0);
}

#[tokio::test]
async fn test_owner_cannot_redeem_delisted_item() {
    let api = FakeApi::new();
    let mut own = item("i1", "bob", 100);
    own.is_available = false;
    let app = app_as(&api, Some(user("bob", 250)));

    let form = app
        .swap_form(&own, SwapIntent::Redeem)
        .expect("logged in user should get a form");
    let result = app.request_swap(&own, &form).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert_eq!(api.call_count("redeem_by_owner"), 0);
    assert_eq!(app.session().user().expect("still logged in").points, 250);
}

#[tokio::test]
async fn test_direct_swap_rejected_by_owner_reaches_terminal_state() {
    // Arrange: alice offers one of her items for bob's
    let api = FakeApi::new();
    api.add_item(item("i1", "bob", 100));
    api.add_item(item("a1", "alice", 80));
    let alice = app_as(&api, Some(user("alice", 0)));
    let target = alice.item("i1").await.expect("item fetch should succeed in test");
    let form = alice
        .swap_form(&target, SwapIntent::Swap)
        .expect("logged in user should get a form")
        .offering(["a1"])
        .with_message("Would you trade?");

    let created = match alice.request_swap(&target, &form).await {
        Ok(SwapRequestOutcome::Requested(response)) => response.swap.expect("swap echoed"),
        other => panic!("expected a created swap, got {:?}", other),
    };
    assert_eq!(
        api.calls_named("create_swap")[0].body["offeredItems"],
        json!(["a1"])
    );

    let bob = app_as(&api, Some(user("bob", 0)));
    let pending = bob
        .swap_query(&created.id)
        .fetch(bob.cache())
        .await
        .expect("swap fetch should succeed in test")
        .swap;
    let controls = bob.swap_controls(&pending);
    assert!(controls.can_respond && controls.can_cancel);
    assert!(!controls.can_complete);

    // Act
    bob.respond_swap(&pending, RespondAction::Reject, Some("  ".to_string()))
        .await
        .expect("reject should succeed in test");

    // Assert
    let respond = &api.calls_named("respond_swap")[0];
    assert_eq!(respond.body, json!({ "action": "reject" }));

    let refreshed = bob
        .swap_query(&created.id)
        .fetch(bob.cache())
        .await
        .expect("swap refetch should succeed in test")
        .swap;
    assert_eq!(refreshed.status, SwapStatus::Rejected);
    assert!(!bob.swap_controls(&refreshed).any());

    let again = bob.complete_swap(&refreshed).await;
    assert!(matches!(
        again,
        Err(AppError::InvalidTransition { from: SwapStatus::Rejected, .. })
    ));
    assert_eq!(api.call_count("complete_swap"), 0);
}

#[tokio::test]
async fn test_complete_on_pending_swap_is_rejected_locally() {
    let api = FakeApi::new();
    let pending = swap("s1", "i1", "bob", "alice", SwapStatus::Pending);
    api.add_swap(pending.clone());
    let app = app_as(&api, Some(user("bob", 0)));

    let result = app.complete_swap(&pending).await;

    assert!(matches!(
        result,
        Err(AppError::InvalidTransition {
            from: SwapStatus::Pending,
            action: SwapAction::Complete,
        })
    ));
    assert_eq!(api.call_count("complete_swap"), 0);
}

#[tokio::test]
async fn test_owner_accepts_then_completes_swap() {
    // Arrange
    let api = FakeApi::new();
    api.add_swap(swap("s1", "i1", "bob", "alice", SwapStatus::Pending));
    let app = app_as(&api, Some(user("bob", 0)));
    let stats_key = QueryKey::new(ResourceKind::UserStats);
    let stats = queries::user_stats(app.api()).with_options(long_lived());
    stats
        .fetch(app.cache())
        .await
        .expect("stats fetch should succeed in test");
    assert!(!app.cache().state(&stats_key).expect("stats cached").is_stale);
    let pending = app
        .swap_query("s1")
        .fetch(app.cache())
        .await
        .expect("swap fetch should succeed in test")
        .swap;

    // Act: accept
    app.respond_swap(&pending, RespondAction::Accept, None)
        .await
        .expect("accept should succeed in test");

    // Assert
    assert_eq!(
        api.calls_named("respond_swap")[0].body,
        json!({ "action": "accept" })
    );
    let accepted = app
        .swap_query("s1")
        .fetch(app.cache())
        .await
        .expect("swap refetch should succeed in test")
        .swap;
    assert_eq!(accepted.status, SwapStatus::Accepted);
    assert!(app.swap_controls(&accepted).can_complete);
    assert!(app.cache().state(&stats_key).expect("stats cached").is_stale);

    // Act: complete
    stats
        .fetch(app.cache())
        .await
        .expect("stats refetch should succeed in test");
    assert!(!app.cache().state(&stats_key).expect("stats cached").is_stale);
    app.complete_swap(&accepted)
        .await
        .expect("complete should succeed in test");

    // Assert
    let completed = app
        .swap_query("s1")
        .fetch(app.cache())
        .await
        .expect("swap refetch should succeed in test")
        .swap;
    assert_eq!(completed.status, SwapStatus::Completed);
    let controls = app.swap_controls(&completed);
    assert!(!controls.can_respond && !controls.can_complete && !controls.can_cancel);
    assert!(controls.can_rate);
    assert!(app.cache().state(&stats_key).expect("stats cached").is_stale);
    assert_eq!(
        success_toasts(&app.drain_events()),
        vec!["Swap response sent successfully!", "Swap completed successfully!"]
    );
}

#[tokio::test]
async fn test_requester_cannot_accept_own_request() {
    let api = FakeApi::new();
    let pending = swap("s1", "i1", "bob", "alice", SwapStatus::Pending);
    api.add_swap(pending.clone());
    let app = app_as(&api, Some(user("alice", 0)));

    let result = app.respond_swap(&pending, RespondAction::Accept, None).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert_eq!(api.call_count("respond_swap"), 0);
}

#[tokio::test]
async fn test_server_rejection_leaves_displayed_status_unchanged() {
    // Arrange
    let api = FakeApi::new();
    api.add_swap(swap("s1", "i1", "bob", "alice", SwapStatus::Pending));
    let app = app_as(&api, Some(user("bob", 0)));
    let shown = app
        .swap_query("s1")
        .fetch(app.cache())
        .await
        .expect("swap fetch should succeed in test")
        .swap;
    api.fail(
        "respond_swap",
        ApiError::Server {
            status: 400,
            message: Some("Swap has already been responded to".to_string()),
        },
    );

    // Act
    let result = app.respond_swap(&shown, RespondAction::Accept, None).await;

    // Assert
    match result {
        Err(AppError::Api(e)) => assert_eq!(e.message(), "Swap has already been responded to"),
        other => panic!("expected server error, got {:?}", other),
    }
    let cached = app
        .cache()
        .peek::<shared::SwapResponse>(&swap_key("s1"))
        .expect("swap stays cached");
    assert_eq!(cached.swap.status, SwapStatus::Pending);
    assert!(success_toasts(&app.drain_events()).is_empty());
}

#[tokio::test]
async fn test_cancel_by_requester_sends_trimmed_reason() {
    let api = FakeApi::new();
    let accepted = swap("s1", "i1", "bob", "alice", SwapStatus::Accepted);
    api.add_swap(accepted.clone());
    let app = app_as(&api, Some(user("alice", 0)));

    app.cancel_swap(&accepted, Some(String::new()))
        .await
        .expect("cancel should succeed in test");

    assert_eq!(api.calls_named("cancel_swap")[0].body, json!({}));
    assert_eq!(
        api.swap("s1").expect("swap stored").status,
        SwapStatus::Cancelled
    );
}

#[tokio::test]
async fn test_rating_requires_completed_swap() {
    let api = FakeApi::new();
    let pending = swap("s1", "i1", "bob", "alice", SwapStatus::Pending);
    let done = swap("s2", "i2", "bob", "alice", SwapStatus::Completed);
    let app = app_as(&api, Some(user("alice", 0)));

    assert!(matches!(
        app.rate_swap(&pending, 5, None).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        app.rate_swap(&done, 0, None).await,
        Err(AppError::Validation { ref field, .. }) if field == "rating"
    ));
    app.rate_swap(&done, 4, Some("Lovely jacket".to_string()))
        .await
        .expect("rating should succeed in test");

    let rated = api.calls_named("rate_swap");
    assert_eq!(rated.len(), 1);
    assert_eq!(rated[0].body, json!({ "rating": 4, "review": "Lovely jacket" }));
}

#[tokio::test]
async fn test_swap_lists_split_received_and_sent() {
    let api = FakeApi::new();
    api.add_swap(swap("s1", "i1", "bob", "alice", SwapStatus::Pending));
    api.add_swap(swap("s2", "a1", "alice", "bob", SwapStatus::Pending));
    api.add_swap(swap("s3", "i3", "bob", "carol", SwapStatus::Completed));
    let app = app_as(&api, Some(user("bob", 0)));

    let lists = app.swap_lists().await.expect("swaps fetch should succeed in test");

    let received: Vec<&str> = lists.received.iter().map(|s| s.id.as_str()).collect();
    let sent: Vec<&str> = lists.sent.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(received, vec!["s1", "s3"]);
    assert_eq!(sent, vec!["s2"]);
    assert_eq!(lists.pending_received(), 1);
}

#[tokio::test]
async fn test_superseded_filter_result_never_replaces_newer_one() {
    // Arrange
    let api = FakeApi::new();
    api.add_item(item_json("t1", "bob", 10).category("tops").build());
    api.add_item(item_json("d1", "bob", 10).category("dresses").build());
    api.delay_category("tops", Duration::from_millis(50));
    api.delay_category("dresses", Duration::from_millis(5));
    let app = app_as(&api, None);

    let tops = ItemFilters {
        category: Some(Category::Tops),
        ..Default::default()
    };
    let dresses = ItemFilters {
        category: Some(Category::Dresses),
        ..Default::default()
    };
    let view = app.view::<ItemsResponse>();
    let tops_query = app.items_query(tops);
    let dresses_query = app.items_query(dresses.clone());

    // Act
    let (slow, fast) = tokio::join!(view.load(&tops_query), async {
        tokio::time::sleep(Duration::from_millis(1)).await;
        view.load(&dresses_query).await
    });

    // Assert
    assert_eq!(slow.expect("tops should load").items[0].id, "t1");
    assert_eq!(fast.expect("dresses should load").items[0].id, "d1");

    let shown = view.data().expect("view should have data");
    let ids: Vec<&str> = shown.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["d1"]);
    assert_eq!(view.key(), Some(items_key(&dresses)));
    assert!(!view.is_previous_data());
}

#[tokio::test]
async fn test_concurrent_reads_share_one_request() {
    let api = FakeApi::new();
    api.add_item(item("i1", "bob", 10));
    api.delay_category("tops", Duration::from_millis(20));
    let app = app_as(&api, None);
    let filters = ItemFilters {
        category: Some(Category::Tops),
        ..Default::default()
    };

    let (a, b) = tokio::join!(app.items(filters.clone()), app.items(filters));

    assert_eq!(a.expect("first read"), b.expect("second read"));
    assert_eq!(api.call_count("list_items"), 1);
}

#[tokio::test]
async fn test_create_item_invalidates_before_navigating() {
    // Arrange
    let api = FakeApi::new();
    let app = app_as(&api, Some(user("alice", 0)));
    let listing_key = items_key(&ItemFilters::default());
    app.items_query(ItemFilters::default())
        .with_options(long_lived())
        .fetch(app.cache())
        .await
        .expect("listing fetch should succeed in test");

    let fields = NewItemFields {
        title: "Denim jacket".to_string(),
        description: "Barely worn".to_string(),
        category: Category::Outerwear,
        size: Size::Medium,
        condition: Condition::LikeNew,
        points_value: 120,
        tags: vec!["denim".to_string()],
    };

    // Act
    let response = app
        .create_item(&fields, vec![image("front.jpg")])
        .await
        .expect("create should succeed in test");

    // Assert
    assert_eq!(response.item.expect("item echoed").title, "Denim jacket");
    assert_eq!(api.calls_named("create_item")[0].body["images"], json!(1));
    assert!(app.cache().state(&listing_key).expect("entry").is_stale);
    assert_eq!(
        app.drain_events(),
        vec![
            AppEvent::toast(ToastLevel::Success, "Item added successfully!"),
            AppEvent::Navigate(Route::Dashboard),
        ]
    );
}

#[tokio::test]
async fn test_create_item_without_images_makes_no_call() {
    let api = FakeApi::new();
    let app = app_as(&api, Some(user("alice", 0)));
    let fields = NewItemFields {
        title: "Scarf".to_string(),
        description: "Wool".to_string(),
        category: Category::Accessories,
        size: Size::OneSize,
        condition: Condition::Good,
        points_value: 20,
        tags: Vec::new(),
    };

    let result = app.create_item(&fields, Vec::new()).await;

    assert!(matches!(
        result,
        Err(AppError::Validation { ref field, .. }) if field == "images"
    ));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_mark_unavailable_navigates_to_listings() {
    let api = FakeApi::new();
    api.add_item(item("i1", "bob", 100));
    let app = app_as(&api, Some(user("bob", 0)));
    let own = app.item("i1").await.expect("item fetch should succeed in test");

    app.mark_unavailable(&own)
        .await
        .expect("mark unavailable should succeed in test");

    assert!(!api.item("i1").expect("item stored").is_available);
    assert!(app.cache().state(&item_key("i1")).expect("entry").is_stale);
    assert_eq!(
        app.drain_events(),
        vec![
            AppEvent::toast(ToastLevel::Success, "Item marked as unavailable successfully"),
            AppEvent::Navigate(Route::MyListings),
        ]
    );
}
