use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use httpipe::middleware::Catch;
use httpipe::sink::{self, DefaultSink};
use httpipe::{func, RequestOptions};

static SEEN: Lazy<Arc<Mutex<Vec<String>>>> = Lazy::new(|| Arc::new(Mutex::new(vec![])));

#[tokio::test]
async fn requests_fall_back_to_the_configured_sink() {
    let seen = SEEN.clone();
    assert!(sink::configure(DefaultSink::Custom(Arc::new(move |msg: &str| {
        seen.lock().unwrap().push(msg.to_string())
    }))));

    let app = Catch::new(func!(Err("boom!".into())));
    let res = httpipe::call(&app, RequestOptions::new()).await.unwrap();
    assert_eq!(res.status(), 500);
    assert_eq!(
        *SEEN.lock().unwrap(),
        vec!["Error: boom!".to_string()]
    );
}
