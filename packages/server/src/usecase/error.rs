//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::ValueObjectError;

/// メッセージ送信のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// 本文が検証に失敗した（論理時刻は消費されない）
    #[error(transparent)]
    Invalid(#[from] ValueObjectError),
}
