//! Canned reply texts sent back to wedding guests.

/// Answer to any text message: explains what the bot is for.
pub const TEXT_GUIDE: &str = "結婚式の画像を送信すると、プロジェクターにその画像が映し出されます！";

/// The last processed image of a send was saved.
pub const IMAGE_SAVED: &str = "ありがとうございます！画像を受け取りました！";

/// The last processed image of a send could not be saved.
pub const IMAGE_FAILED: &str = "画像の処理中にエラーが発生しました😭";

/// Stickers, video, audio, location, and anything else.
pub const UNSUPPORTED: &str =
    "対応していない形式です。結婚式の画像を送信すると、プロジェクターにその画像が映し出されます！";
