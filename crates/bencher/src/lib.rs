use micro_route::{handler_fn, HandlerArgs, MethodToken, RouteError, Router};

/// Templates registered by every benchmark router, in registration order.
pub static TEMPLATES: &[(MethodToken, &str)] = &[
    (MethodToken::Get, "/"),
    (MethodToken::Get, "/about"),
    (MethodToken::Get, "/users"),
    (MethodToken::Get, "/users/{name}"),
    (MethodToken::Get, "/users/{int:id}"),
    (MethodToken::Get, "/users/{int:id}/posts/{int:page=1}"),
    (MethodToken::Post, "/users"),
    (MethodToken::Put, "/users/{int:id}"),
    (MethodToken::Delete, "/users/{int:id}"),
    (MethodToken::Get, "/files/{name}.{ext}"),
    (MethodToken::Get, "/flags/{bool:flag}"),
    (MethodToken::Get, "/archive/{int:year}-{int:month}-{int:day}"),
    (MethodToken::CatchAll, "/{page}"),
    (MethodToken::CatchAll, "/{section}/{page?}"),
];

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    method: MethodToken,
    path: &'static str,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, method: MethodToken, path: &'static str) -> Self {
        Self { name, group, method, path }
    }

    pub fn hit(name: &'static str, method: MethodToken, path: &'static str) -> Self {
        Self::new(name, TestGroup::Hit, method, path)
    }

    pub fn fallback(name: &'static str, method: MethodToken, path: &'static str) -> Self {
        Self::new(name, TestGroup::Fallback, method, path)
    }

    pub fn miss(name: &'static str, method: MethodToken, path: &'static str) -> Self {
        Self::new(name, TestGroup::Miss, method, path)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn method(&self) -> MethodToken {
        self.method
    }

    pub fn path(&self) -> &'static str {
        self.path
    }
}

/// Which dispatch path a case exercises.
#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    /// Resolved by the method's own table.
    Hit,
    /// Resolved by the catch-all table.
    Fallback,
    /// Resolved by nothing.
    Miss,
}

/// Builds a router over [`TEMPLATES`] whose handlers return the number of arguments they received.
pub fn create_router() -> Result<Router<usize>, RouteError> {
    TEMPLATES.iter().try_fold(Router::builder(), |builder, (method, template)| {
        builder.route(&[*method], template, handler_fn(Vec::<&str>::new(), |args: HandlerArgs| args.unused().len()))
    })
    .map(|builder| builder.build())
}

pub fn create_test_cases() -> Vec<TestCase> {
    vec![
        TestCase::hit("static", MethodToken::Get, "/about"),
        TestCase::hit("typed_param", MethodToken::Get, "/users/42"),
        TestCase::hit("string_param", MethodToken::Get, "/users/alice"),
        TestCase::hit("default_param", MethodToken::Get, "/users/42/posts"),
        TestCase::hit("many_delimiters", MethodToken::Get, "/archive/2024-01-31"),
        TestCase::fallback("catch_all", MethodToken::Patch, "/pricing"),
        TestCase::fallback("catch_all_optional", MethodToken::Options, "/docs"),
        TestCase::miss("too_long", MethodToken::Get, "/a/b/c/d/e"),
    ]
}
