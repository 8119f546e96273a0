use http::{Method, Request, Response, StatusCode};
use micro_route::{handler_fn, DeclaredParam, DispatchOutcome, HandlerArgs, RouteError, Router};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

fn router() -> Result<Router<Response<String>>, RouteError> {
    Ok(Router::builder()
        .get("/", handler_fn(Vec::<&str>::new(), |_args: HandlerArgs| Response::new("hello world".to_string())))?
        .get(
            "/users/{int:id}",
            handler_fn(["id"], |args: HandlerArgs| {
                Response::new(format!("user #{}", args.get_int("id").unwrap_or_default()))
            }),
        )?
        .get(
            "/users/{name}",
            handler_fn(["name"], |args: HandlerArgs| {
                Response::new(format!("user {}", args.get_str("name").unwrap_or_default()))
            }),
        )?
        .get(
            "/users/{int:id}/posts/{int:page=1}",
            handler_fn(["id", "page"], |args: HandlerArgs| {
                Response::new(format!(
                    "posts of user #{}, page {}",
                    args.get_int("id").unwrap_or_default(),
                    args.get_int("page").unwrap_or_default()
                ))
            }),
        )?
        .post(
            "/users",
            handler_fn([DeclaredParam::with_default("role", "member")], |args: HandlerArgs| {
                Response::new(format!("created {}", args.get_str("role").unwrap_or_default()))
            }),
        )?
        .catch_all(
            "/{page}.{format?}",
            handler_fn([DeclaredParam::required("page"), DeclaredParam::optional("format")], |args: HandlerArgs| {
                let format = args.get_str("format").unwrap_or("html");
                Response::new(format!("static page {} as {format}", args.get_str("page").unwrap_or_default()))
            }),
        )?
        .build())
}

fn not_found() -> Response<String> {
    let mut response = Response::new("404 not found".to_string());
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let router = match router() {
        Ok(router) => router,
        Err(e) => {
            error!(cause = %e, "invalid route");
            return;
        }
    };
    info!(?router, "routes registered");

    let requests = [
        (Method::GET, "/"),
        (Method::GET, "/users/42"),
        (Method::GET, "/users/alice"),
        (Method::GET, "/users/42/posts"),
        (Method::GET, "/users/42/posts/3"),
        (Method::POST, "/users"),
        (Method::HEAD, "/pricing.json"),
        (Method::DELETE, "/about"),
        (Method::GET, "/no/such/route"),
    ];

    for (method, path) in requests {
        let request = Request::builder().method(method).uri(path).body(()).expect("request should be valid");
        let response = match router.route(&request) {
            Ok(DispatchOutcome::Matched(response)) => response,
            Ok(DispatchOutcome::NotFound) => not_found(),
            Err(e) => {
                error!(cause = %e, "dispatch error");
                let mut response = Response::new(e.to_string());
                *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                response
            }
        };
        info!(method = %request.method(), path = request.uri().path(), status = %response.status(), body = response.body(), "dispatched");
    }
}
