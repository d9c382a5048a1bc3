use dioxus::prelude::*;
use services::{CatalogError, PersistenceError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    InvalidSelection,
    NotFound,
    Unavailable,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Unknown => "出错了，请重试。",
            Self::InvalidSelection => "请先选择测试类型和测试名称。",
            Self::NotFound => "没有找到对应的记录。",
            Self::Unavailable => "无法连接服务器。",
        }
    }
}

impl From<PersistenceError> for ViewError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Status { status: 404, .. } => Self::NotFound,
            PersistenceError::Transport(_) => Self::Unavailable,
            _ => Self::Unknown,
        }
    }
}

impl From<CatalogError> for ViewError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnknownType(_) => Self::InvalidSelection,
            _ => Self::Unavailable,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
