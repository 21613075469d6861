//! Method registration
//!
//! A suite lists its methods in a [`Methods`] registry. The parameter shape
//! of each method is taken from its Rust signature through [`IntoMethod`],
//! so a method whose shape cannot receive a context is still registered and
//! later reported instead of silently ignored.

use serde::Serialize;
use std::fmt;
use std::panic::Location;

use super::Suite;
use crate::context::{F, T};
use crate::models::Site;

/// Kind of context a method is expected to take
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    /// `&mut F`, taken by fixture hooks
    Suite,
    /// `&mut T`, taken by test cases
    Test,
}

impl ContextKind {
    pub fn type_name(self) -> &'static str {
        match self {
            ContextKind::Suite => "&mut suitecheck::F",
            ContextKind::Test => "&mut suitecheck::T",
        }
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// One declared parameter of a registered method
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamType {
    Context(ContextKind),
    Value(&'static str),
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Context(kind) => kind.fmt(f),
            ParamType::Value(name) => f.write_str(name),
        }
    }
}

/// Plain value parameters a method may declare
pub trait Arg: 'static {
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl Arg for bool {}
impl Arg for i32 {}
impl Arg for i64 {}
impl Arg for u32 {}
impl Arg for u64 {}
impl Arg for usize {}
impl Arg for f64 {}
impl Arg for String {}

pub(crate) enum Body<S> {
    Fixture(Box<dyn Fn(&mut S, &mut F)>),
    Test(Box<dyn Fn(&mut S, &mut T)>),
    /// The shape cannot take a context, so there is nothing to call.
    Unreachable,
}

impl<S: 'static> Body<S> {
    fn project<O: 'static>(self, project: fn(&mut O) -> &mut S) -> Body<O> {
        match self {
            Body::Fixture(body) => {
                Body::Fixture(Box::new(move |outer: &mut O, f: &mut F| body(project(outer), f)))
            }
            Body::Test(body) => {
                Body::Test(Box::new(move |outer: &mut O, t: &mut T| body(project(outer), t)))
            }
            Body::Unreachable => Body::Unreachable,
        }
    }
}

/// Parameter list and callable extracted from a method
pub struct Shape<S> {
    params: Vec<ParamType>,
    body: Body<S>,
}

/// Conversion from a suite method into its [`Shape`].
///
/// `Marker` only disambiguates the implementations; callers never name it.
pub trait IntoMethod<S, Marker> {
    fn into_shape(self) -> Shape<S>;
}

impl<S, Func> IntoMethod<S, fn()> for Func
where
    Func: Fn(&mut S),
{
    fn into_shape(self) -> Shape<S> {
        Shape {
            params: Vec::new(),
            body: Body::Unreachable,
        }
    }
}

impl<S, Func> IntoMethod<S, fn(&mut F)> for Func
where
    Func: Fn(&mut S, &mut F) + 'static,
{
    fn into_shape(self) -> Shape<S> {
        Shape {
            params: vec![ParamType::Context(ContextKind::Suite)],
            body: Body::Fixture(Box::new(self)),
        }
    }
}

impl<S, Func> IntoMethod<S, fn(&mut T)> for Func
where
    Func: Fn(&mut S, &mut T) + 'static,
{
    fn into_shape(self) -> Shape<S> {
        Shape {
            params: vec![ParamType::Context(ContextKind::Test)],
            body: Body::Test(Box::new(self)),
        }
    }
}

impl<S, Func, A> IntoMethod<S, fn(A)> for Func
where
    Func: Fn(&mut S, A),
    A: Arg,
{
    fn into_shape(self) -> Shape<S> {
        Shape {
            params: vec![ParamType::Value(A::type_name())],
            body: Body::Unreachable,
        }
    }
}

impl<S, Func, A> IntoMethod<S, fn(&mut F, A)> for Func
where
    Func: Fn(&mut S, &mut F, A),
    A: Arg,
{
    fn into_shape(self) -> Shape<S> {
        Shape {
            params: vec![
                ParamType::Context(ContextKind::Suite),
                ParamType::Value(A::type_name()),
            ],
            body: Body::Unreachable,
        }
    }
}

impl<S, Func, A> IntoMethod<S, fn(&mut T, A)> for Func
where
    Func: Fn(&mut S, &mut T, A),
    A: Arg,
{
    fn into_shape(self) -> Shape<S> {
        Shape {
            params: vec![
                ParamType::Context(ContextKind::Test),
                ParamType::Value(A::type_name()),
            ],
            body: Body::Unreachable,
        }
    }
}

pub(crate) struct Method<S> {
    pub(crate) name: String,
    pub(crate) site: Site,
    pub(crate) shape: Shape<S>,
}

impl<S: 'static> Method<S> {
    fn project<O: 'static>(self, project: fn(&mut O) -> &mut S) -> Method<O> {
        Method {
            name: self.name,
            site: self.site,
            shape: Shape {
                params: self.shape.params,
                body: self.shape.body.project(project),
            },
        }
    }
}

/// Registry of the methods a suite exposes
pub struct Methods<S> {
    entries: Vec<Method<S>>,
}

impl<S: 'static> Methods<S> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a method under `name`, replacing any earlier one.
    ///
    /// The call site becomes the method's declared location in reports.
    #[track_caller]
    pub fn add<M>(&mut self, name: &str, method: impl IntoMethod<S, M>) -> &mut Self {
        let site = Site::from_location(Location::caller());
        self.insert(Method {
            name: name.to_string(),
            site,
            shape: method.into_shape(),
        });
        self
    }

    /// Import every method of an embedded suite.
    ///
    /// Methods added afterwards with the same name override the imported ones.
    pub fn promote<I: Suite>(&mut self, project: fn(&mut S) -> &mut I) -> &mut Self {
        let mut inner = Methods::<I>::new();
        I::register(&mut inner);
        for method in inner.entries {
            self.insert(method.project(project));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|m| m.name.as_str()).collect()
    }

    pub(crate) fn into_entries(self) -> Vec<Method<S>> {
        self.entries
    }

    fn insert(&mut self, method: Method<S>) {
        match self.entries.iter_mut().find(|m| m.name == method.name) {
            Some(existing) => *existing = method,
            None => self.entries.push(method),
        }
    }
}

impl<S: 'static> Default for Methods<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// A discovered method bound to its role in the suite
pub struct MethodHandle<S> {
    name: String,
    qualified_name: String,
    expected: ContextKind,
    site: Site,
    params: Vec<ParamType>,
    body: Body<S>,
}

impl<S> MethodHandle<S> {
    pub(crate) fn new(suite_name: &str, method: Method<S>, expected: ContextKind) -> Self {
        Self {
            qualified_name: format!("{}.{}", suite_name, method.name),
            name: method.name,
            expected,
            site: method.site,
            params: method.shape.params,
            body: method.shape.body,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Suite.Method`
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn expected(&self) -> ContextKind {
        self.expected
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    /// Call a fixture hook. Returns `false` when the body cannot take an `F`.
    pub(crate) fn invoke_fixture(&self, suite: &mut S, f: &mut F) -> bool {
        match &self.body {
            Body::Fixture(body) => {
                body(suite, f);
                true
            }
            _ => false,
        }
    }

    /// Call a test case. Returns `false` when the body cannot take a `T`.
    pub(crate) fn invoke_test(&self, suite: &mut S, t: &mut T) -> bool {
        match &self.body {
            Body::Test(body) => {
                body(suite, t);
                true
            }
            _ => false,
        }
    }
}

impl<S> fmt::Debug for MethodHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodHandle")
            .field("qualified_name", &self.qualified_name)
            .field("expected", &self.expected)
            .field("site", &self.site)
            .field("params", &self.params)
            .finish()
    }
}
