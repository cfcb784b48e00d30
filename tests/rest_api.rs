use photogram_backend::api;
use photogram_backend::config::{AuthConfig, FileConfig, PhotogramConfig, PhotogramPaths};
use photogram_backend::database::Database;
use tempfile::{tempdir, TempDir};
use tokio::time::{sleep, Duration};

struct TestServer {
    _dir: TempDir,
    base_url: String,
    server: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn shutdown(self) {
        self.server.abort();
        let _ = self.server.await;
    }
}

fn next_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind ephemeral port")
        .local_addr()
        .unwrap()
        .port()
}

async fn wait_for_health(base_url: &str) {
    let client = reqwest::Client::new();
    for _ in 0..50 {
        if let Ok(resp) = client.get(format!("{base_url}/api/health")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        sleep(Duration::from_millis(100)).await;
    }
    panic!("server did not become healthy in time");
}

async fn spawn_server(max_upload_bytes: u64) -> TestServer {
    let dir = tempdir().expect("tempdir");
    let port = next_port();
    let config = PhotogramConfig::new(
        port,
        PhotogramPaths::from_base_dir(dir.path()).expect("paths"),
        AuthConfig {
            token_secret: "test-secret".into(),
        },
        FileConfig { max_upload_bytes },
    );

    let database = Database::connect(&config.paths).expect("database");
    database.ensure_migrations().expect("migrations");

    let server_config = config.clone();
    let server = tokio::spawn(async move {
        let _ = api::serve_http(server_config, database).await;
    });

    let base_url = format!("http://127.0.0.1:{port}");
    wait_for_health(&base_url).await;

    TestServer {
        _dir: dir,
        base_url,
        server,
    }
}

async fn register(client: &reqwest::Client, base_url: &str, username: &str) -> serde_json::Value {
    client
        .post(format!("{base_url}/api/register"))
        .json(&serde_json::json!({ "username": username, "password": "password123" }))
        .send()
        .await
        .expect("register response")
        .json()
        .await
        .expect("register json")
}

fn image_form(name: &str, bytes: Vec<u8>, mime: &str, caption: &str) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .part(
            "image",
            reqwest::multipart::Part::bytes(bytes)
                .file_name(name.to_string())
                .mime_str(mime)
                .unwrap(),
        )
        .text("caption", caption.to_string())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn register_upload_like_comment_roundtrip() {
    let server = spawn_server(5 * 1024 * 1024).await;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    // alice registers and logs in; both mint usable tokens
    let registered = register(&client, base, "alice").await;
    let alice_id = registered["id"].as_str().expect("alice id").to_string();

    let login: serde_json::Value = client
        .post(format!("{base}/api/login"))
        .json(&serde_json::json!({ "username": "alice", "password": "password123" }))
        .send()
        .await
        .expect("login response")
        .json()
        .await
        .expect("login json");
    assert_eq!(login["id"].as_str(), Some(alice_id.as_str()));
    let alice_token = login["token"].as_str().expect("alice token").to_string();

    // alice uploads a post
    let created: serde_json::Value = client
        .post(format!("{base}/api/posts"))
        .bearer_auth(&alice_token)
        .multipart(image_form("photo.jpg", b"fake image bytes".to_vec(), "image/jpeg", "hi"))
        .send()
        .await
        .expect("create post response")
        .json()
        .await
        .expect("post json");
    let post_id = created["id"].as_str().expect("post id").to_string();
    assert_eq!(created["username"].as_str(), Some("alice"));
    assert_eq!(created["caption"].as_str(), Some("hi"));
    assert_eq!(created["likes_count"].as_i64(), Some(0));

    // the blob is re-served under its locator
    let locator = created["image_path"].as_str().expect("locator");
    assert!(locator.starts_with("/uploads/"));
    let blob = client
        .get(format!("{base}{locator}"))
        .send()
        .await
        .expect("blob response");
    assert!(blob.status().is_success());
    assert_eq!(blob.bytes().await.expect("blob bytes").as_ref(), b"fake image bytes");

    // anonymous feed: one post, zero engagement, liked always false
    let feed: serde_json::Value = client
        .get(format!("{base}/api/posts"))
        .send()
        .await
        .expect("feed response")
        .json()
        .await
        .expect("feed json");
    let posts = feed.as_array().expect("feed array");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["username"].as_str(), Some("alice"));
    assert_eq!(posts[0]["likes_count"].as_i64(), Some(0));
    assert_eq!(posts[0]["comments_count"].as_i64(), Some(0));
    assert_eq!(posts[0]["liked"].as_bool(), Some(false));

    // bob registers, likes and comments on alice's post
    let bob = register(&client, base, "bob").await;
    let bob_token = bob["token"].as_str().expect("bob token").to_string();

    let like: serde_json::Value = client
        .post(format!("{base}/api/posts/{post_id}/like"))
        .bearer_auth(&bob_token)
        .send()
        .await
        .expect("like response")
        .json()
        .await
        .expect("like json");
    assert_eq!(like["success"].as_bool(), Some(true));

    let comment: serde_json::Value = client
        .post(format!("{base}/api/posts/{post_id}/comments"))
        .bearer_auth(&bob_token)
        .json(&serde_json::json!({ "text": "nice!" }))
        .send()
        .await
        .expect("comment response")
        .json()
        .await
        .expect("comment json");
    assert_eq!(comment["username"].as_str(), Some("bob"));

    // whitespace-only comment text is a validation error and is not stored
    let blank = client
        .post(format!("{base}/api/posts/{post_id}/comments"))
        .bearer_auth(&bob_token)
        .json(&serde_json::json!({ "text": "   " }))
        .send()
        .await
        .expect("blank comment response");
    assert_eq!(blank.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = blank.json().await.expect("blank comment json");
    assert_eq!(body["message"].as_str(), Some("Comment text is required"));

    // alice's view: counts updated, but she has not liked it herself
    let feed: serde_json::Value = client
        .get(format!("{base}/api/posts"))
        .bearer_auth(&alice_token)
        .send()
        .await
        .expect("alice feed")
        .json()
        .await
        .expect("alice feed json");
    let posts = feed.as_array().unwrap();
    assert_eq!(posts[0]["likes_count"].as_i64(), Some(1));
    assert_eq!(posts[0]["comments_count"].as_i64(), Some(1));
    assert_eq!(posts[0]["liked"].as_bool(), Some(false));

    // bob's view shows his own like
    let feed: serde_json::Value = client
        .get(format!("{base}/api/posts"))
        .bearer_auth(&bob_token)
        .send()
        .await
        .expect("bob feed")
        .json()
        .await
        .expect("bob feed json");
    assert_eq!(feed.as_array().unwrap()[0]["liked"].as_bool(), Some(true));

    // comments are public, newest first, with the author's username
    let comments: serde_json::Value = client
        .get(format!("{base}/api/posts/{post_id}/comments"))
        .send()
        .await
        .expect("comments response")
        .json()
        .await
        .expect("comments json");
    let comments = comments.as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["text"].as_str(), Some("nice!"));
    assert_eq!(comments[0]["username"].as_str(), Some("bob"));

    // a second like toggles the first away
    client
        .post(format!("{base}/api/posts/{post_id}/like"))
        .bearer_auth(&bob_token)
        .send()
        .await
        .expect("unlike response");
    let feed: serde_json::Value = client
        .get(format!("{base}/api/posts"))
        .bearer_auth(&bob_token)
        .send()
        .await
        .expect("bob feed after unlike")
        .json()
        .await
        .expect("bob feed json");
    assert_eq!(feed.as_array().unwrap()[0]["likes_count"].as_i64(), Some(0));
    assert_eq!(feed.as_array().unwrap()[0]["liked"].as_bool(), Some(false));

    // profile view scopes to the owner's posts
    let profile: serde_json::Value = client
        .get(format!("{base}/api/users/alice"))
        .send()
        .await
        .expect("profile response")
        .json()
        .await
        .expect("profile json");
    assert_eq!(profile["username"].as_str(), Some("alice"));
    assert_eq!(profile["posts"].as_array().unwrap().len(), 1);

    let missing = client
        .get(format!("{base}/api/users/nobody"))
        .send()
        .await
        .expect("missing profile response");
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);

    server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn rejects_bad_credentials_and_tokens() {
    let server = spawn_server(5 * 1024 * 1024).await;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    register(&client, base, "alice").await;

    // duplicate username is a 400 (kept from the source behavior, not 409)
    let dup = client
        .post(format!("{base}/api/register"))
        .json(&serde_json::json!({ "username": "alice", "password": "other" }))
        .send()
        .await
        .expect("duplicate register");
    assert_eq!(dup.status(), reqwest::StatusCode::BAD_REQUEST);

    let bad_password = client
        .post(format!("{base}/api/login"))
        .json(&serde_json::json!({ "username": "alice", "password": "wrong" }))
        .send()
        .await
        .expect("bad password login");
    assert_eq!(bad_password.status(), reqwest::StatusCode::BAD_REQUEST);

    let unknown_user = client
        .post(format!("{base}/api/login"))
        .json(&serde_json::json!({ "username": "nobody", "password": "x" }))
        .send()
        .await
        .expect("unknown user login");
    assert_eq!(unknown_user.status(), reqwest::StatusCode::BAD_REQUEST);

    // missing token is 401, garbage token is 403
    let no_token = client
        .post(format!("{base}/api/posts"))
        .multipart(image_form("a.png", vec![1, 2, 3], "image/png", ""))
        .send()
        .await
        .expect("upload without token");
    assert_eq!(no_token.status(), reqwest::StatusCode::UNAUTHORIZED);

    let bad_token = client
        .post(format!("{base}/api/posts"))
        .bearer_auth("not-a-real-token")
        .multipart(image_form("a.png", vec![1, 2, 3], "image/png", ""))
        .send()
        .await
        .expect("upload with bad token");
    assert_eq!(bad_token.status(), reqwest::StatusCode::FORBIDDEN);

    // an unverifiable token on an optional-auth route degrades to anonymous
    let feed = client
        .get(format!("{base}/api/posts"))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .expect("feed with bad token");
    assert!(feed.status().is_success());

    server.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn rejects_bad_uploads() {
    // tiny ceiling keeps the oversize case cheap
    let server = spawn_server(64 * 1024).await;
    let client = reqwest::Client::new();
    let base = &server.base_url;

    let session = register(&client, base, "alice").await;
    let token = session["token"].as_str().unwrap().to_string();

    // declared text/plain is rejected even with image bytes inside
    let png_magic = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    let wrong_type = client
        .post(format!("{base}/api/posts"))
        .bearer_auth(&token)
        .multipart(image_form("notes.txt", png_magic, "text/plain", ""))
        .send()
        .await
        .expect("wrong type upload");
    assert_eq!(wrong_type.status(), reqwest::StatusCode::BAD_REQUEST);

    // over the ceiling
    let oversized = client
        .post(format!("{base}/api/posts"))
        .bearer_auth(&token)
        .multipart(image_form(
            "big.png",
            vec![0u8; 100 * 1024],
            "image/png",
            "",
        ))
        .send()
        .await
        .expect("oversized upload");
    assert_eq!(oversized.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = oversized.json().await.expect("oversized body");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("File size too large"));

    // no image field at all
    let no_file = client
        .post(format!("{base}/api/posts"))
        .bearer_auth(&token)
        .multipart(reqwest::multipart::Form::new().text("caption", "just words"))
        .send()
        .await
        .expect("missing file upload");
    assert_eq!(no_file.status(), reqwest::StatusCode::BAD_REQUEST);

    // nothing made it into the feed
    let feed: serde_json::Value = client
        .get(format!("{base}/api/posts"))
        .send()
        .await
        .expect("feed response")
        .json()
        .await
        .expect("feed json");
    assert!(feed.as_array().unwrap().is_empty());

    server.shutdown().await;
}
