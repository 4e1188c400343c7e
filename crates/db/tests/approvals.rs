mod common;

use common::{seed_company, seed_release, seed_user};
use pressroom_core::approval::SignOffState;
use pressroom_db::models::approval::CreateApproval;
use pressroom_db::repositories::ApprovalRepo;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn sign_off_is_recorded_exactly_once(pool: PgPool) {
    let author = seed_user(&pool, "ada@example.com", "user").await;
    let acme = seed_company(&pool, author.id, "Acme").await;
    let release = seed_release(&pool, author.id, acme.id, "Launch").await;

    let approval = ApprovalRepo::create(
        &pool,
        &CreateApproval {
            release_id: release.id,
            email: "ada@example.com".to_string(),
            email_to: "cfo@example.com".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(approval.state(), SignOffState::Pending);

    let found = ApprovalRepo::find_by_uuid(&pool, approval.uuid)
        .await
        .unwrap()
        .expect("approval should be found by uuid");
    assert_eq!(found.id, approval.id);

    let signed = ApprovalRepo::sign(&pool, approval.id, false, Some("Wrong figures"))
        .await
        .unwrap()
        .expect("first signature should be recorded");
    assert_eq!(signed.state(), SignOffState::Declined);
    assert_eq!(signed.comment.as_deref(), Some("Wrong figures"));

    let again = ApprovalRepo::sign(&pool, approval.id, true, None)
        .await
        .unwrap();
    assert!(again.is_none(), "a signed approval must not be overwritten");
}

#[sqlx::test(migrations = "./migrations")]
async fn approvals_listed_per_release(pool: PgPool) {
    let author = seed_user(&pool, "ada@example.com", "user").await;
    let acme = seed_company(&pool, author.id, "Acme").await;
    let launch = seed_release(&pool, author.id, acme.id, "Launch").await;
    let other = seed_release(&pool, author.id, acme.id, "Other").await;

    for (release_id, to) in [
        (launch.id, "cfo@example.com"),
        (launch.id, "legal@example.com"),
        (other.id, "pr@example.com"),
    ] {
        ApprovalRepo::create(
            &pool,
            &CreateApproval {
                release_id,
                email: "ada@example.com".to_string(),
                email_to: to.to_string(),
            },
        )
        .await
        .unwrap();
    }

    let approvals = ApprovalRepo::list_for_release(&pool, launch.id)
        .await
        .unwrap();
    assert_eq!(approvals.len(), 2);
    assert!(approvals.iter().all(|a| a.release_id == launch.id));
}
