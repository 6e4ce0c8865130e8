//! Book page editing (replace/add/delete/swap pages, sign).
//!
//! ```text
//! byte kind, byte slot, then per kind:
//!   ReplacePage/AddPage  byte page, string text, string photoName
//!   DeletePage           byte page
//!   SwapPages            byte page, byte secondaryPage
//!   SignBook             string title, string author, string xuid
//! ```

use crate::core::binary::{BinaryReader, BinaryWriter};
use crate::error::{ConstructionError, DecodeError, DecodeResult};
use crate::packets::{ids, GamePacket};

/// Pages per book.
pub const MAX_PAGES: u8 = 50;

/// Maximum page text length in bytes.
pub const MAX_PAGE_TEXT_LENGTH: usize = 256;

/// Maximum title length in bytes.
pub const MAX_TITLE_LENGTH: usize = 32;

/// Maximum author length in bytes.
pub const MAX_AUTHOR_LENGTH: usize = 32;

/// A page index, always below [`MAX_PAGES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageNumber(u8);

impl PageNumber {
    pub fn new(page: u8) -> Result<Self, ConstructionError> {
        if page < MAX_PAGES {
            Ok(Self(page))
        } else {
            Err(ConstructionError::PageOutOfRange(page))
        }
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    fn read(reader: &mut BinaryReader<'_>) -> DecodeResult<Self> {
        let page = reader.get_byte()?;
        Self::new(page).map_err(|_| DecodeError::PageOutOfRange { page })
    }
}

impl TryFrom<u8> for PageNumber {
    type Error = ConstructionError;

    fn try_from(page: u8) -> Result<Self, Self::Error> {
        Self::new(page)
    }
}

/// Wire discriminant of a book edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BookEditKind {
    ReplacePage = 0,
    AddPage = 1,
    DeletePage = 2,
    SwapPages = 3,
    SignBook = 4,
}

impl TryFrom<u8> for BookEditKind {
    type Error = DecodeError;

    fn try_from(value: u8) -> DecodeResult<Self> {
        match value {
            0 => Ok(Self::ReplacePage),
            1 => Ok(Self::AddPage),
            2 => Ok(Self::DeletePage),
            3 => Ok(Self::SwapPages),
            4 => Ok(Self::SignBook),
            _ => Err(DecodeError::InvalidDiscriminant {
                kind: "book edit type",
                value: u64::from(value),
            }),
        }
    }
}

/// The edit itself, carrying only the fields its kind puts on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookEditAction {
    ReplacePage {
        page: PageNumber,
        text: String,
        photo_name: String,
    },
    AddPage {
        page: PageNumber,
        text: String,
        photo_name: String,
    },
    DeletePage {
        page: PageNumber,
    },
    SwapPages {
        page: PageNumber,
        secondary_page: PageNumber,
    },
    SignBook {
        title: String,
        author: String,
        xuid: String,
    },
}

impl BookEditAction {
    pub fn kind(&self) -> BookEditKind {
        match self {
            BookEditAction::ReplacePage { .. } => BookEditKind::ReplacePage,
            BookEditAction::AddPage { .. } => BookEditKind::AddPage,
            BookEditAction::DeletePage { .. } => BookEditKind::DeletePage,
            BookEditAction::SwapPages { .. } => BookEditKind::SwapPages,
            BookEditAction::SignBook { .. } => BookEditKind::SignBook,
        }
    }
}

#[doc(alias = "PageEditPacket")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookEditPacket {
    /// Hotbar/inventory slot holding the book.
    pub inventory_slot: u8,
    pub action: BookEditAction,
}

impl BookEditPacket {
    pub fn new(inventory_slot: u8, action: BookEditAction) -> Self {
        Self {
            inventory_slot,
            action,
        }
    }

    pub fn replace_page(
        inventory_slot: u8,
        page: u8,
        text: impl Into<String>,
        photo_name: impl Into<String>,
    ) -> Result<Self, ConstructionError> {
        Ok(Self::new(
            inventory_slot,
            BookEditAction::ReplacePage {
                page: PageNumber::new(page)?,
                text: text.into(),
                photo_name: photo_name.into(),
            },
        ))
    }

    pub fn add_page(
        inventory_slot: u8,
        page: u8,
        text: impl Into<String>,
        photo_name: impl Into<String>,
    ) -> Result<Self, ConstructionError> {
        Ok(Self::new(
            inventory_slot,
            BookEditAction::AddPage {
                page: PageNumber::new(page)?,
                text: text.into(),
                photo_name: photo_name.into(),
            },
        ))
    }

    pub fn delete_page(inventory_slot: u8, page: u8) -> Result<Self, ConstructionError> {
        Ok(Self::new(
            inventory_slot,
            BookEditAction::DeletePage {
                page: PageNumber::new(page)?,
            },
        ))
    }

    pub fn swap_pages(
        inventory_slot: u8,
        page: u8,
        secondary_page: u8,
    ) -> Result<Self, ConstructionError> {
        Ok(Self::new(
            inventory_slot,
            BookEditAction::SwapPages {
                page: PageNumber::new(page)?,
                secondary_page: PageNumber::new(secondary_page)?,
            },
        ))
    }

    pub fn sign_book(
        inventory_slot: u8,
        title: impl Into<String>,
        author: impl Into<String>,
        xuid: impl Into<String>,
    ) -> Self {
        Self::new(
            inventory_slot,
            BookEditAction::SignBook {
                title: title.into(),
                author: author.into(),
                xuid: xuid.into(),
            },
        )
    }

    pub fn kind(&self) -> BookEditKind {
        self.action.kind()
    }
}

impl GamePacket for BookEditPacket {
    const ID: u32 = ids::BOOK_EDIT;
    const NAME: &'static str = "BookEditPacket";

    fn decode_payload(reader: &mut BinaryReader<'_>) -> DecodeResult<Self> {
        let kind = BookEditKind::try_from(reader.get_byte()?)?;
        let inventory_slot = reader.get_byte()?;

        let action = match kind {
            BookEditKind::ReplacePage | BookEditKind::AddPage => {
                let page = PageNumber::read(reader)?;
                let text = reader.get_bounded_string("page text", MAX_PAGE_TEXT_LENGTH)?;
                let photo_name = reader.get_string()?;
                if kind == BookEditKind::ReplacePage {
                    BookEditAction::ReplacePage {
                        page,
                        text,
                        photo_name,
                    }
                } else {
                    BookEditAction::AddPage {
                        page,
                        text,
                        photo_name,
                    }
                }
            }
            BookEditKind::DeletePage => BookEditAction::DeletePage {
                page: PageNumber::read(reader)?,
            },
            BookEditKind::SwapPages => BookEditAction::SwapPages {
                page: PageNumber::read(reader)?,
                secondary_page: PageNumber::read(reader)?,
            },
            BookEditKind::SignBook => BookEditAction::SignBook {
                title: reader.get_bounded_string("title", MAX_TITLE_LENGTH)?,
                author: reader.get_bounded_string("author", MAX_AUTHOR_LENGTH)?,
                xuid: reader.get_string()?,
            },
        };

        Ok(Self {
            inventory_slot,
            action,
        })
    }

    fn encode_payload(&self, writer: &mut BinaryWriter) {
        writer.put_byte(self.kind() as u8);
        writer.put_byte(self.inventory_slot);

        match &self.action {
            BookEditAction::ReplacePage {
                page,
                text,
                photo_name,
            }
            | BookEditAction::AddPage {
                page,
                text,
                photo_name,
            } => {
                writer.put_byte(page.get());
                writer.put_truncated_string(text, MAX_PAGE_TEXT_LENGTH);
                writer.put_string(photo_name);
            }
            BookEditAction::DeletePage { page } => {
                writer.put_byte(page.get());
            }
            BookEditAction::SwapPages {
                page,
                secondary_page,
            } => {
                writer.put_byte(page.get());
                writer.put_byte(secondary_page.get());
            }
            BookEditAction::SignBook {
                title,
                author,
                xuid,
            } => {
                writer.put_truncated_string(title, MAX_TITLE_LENGTH);
                writer.put_truncated_string(author, MAX_AUTHOR_LENGTH);
                writer.put_string(xuid);
            }
        }
    }
}
