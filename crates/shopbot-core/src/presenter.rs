//! Renders the catalog and product detail views as captioned photos with inline menus.

use std::sync::Arc;

use crate::{
    catalog::{Catalog, MediaRef, Product},
    domain::{ChatId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{InlineButton, InlineKeyboard},
    },
    Result,
};

pub const BUY_LABEL: &str = "🛒 Beli di Shopee";
pub const ASK_LABEL: &str = "💬 Tanya via Telegram";
pub const BACK_LABEL: &str = "⬅️ Kembali";

/// Everything needed to draw one screen: image, caption and menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogView {
    pub photo: MediaRef,
    pub caption: String,
    pub keyboard: InlineKeyboard,
}

pub fn catalog_view(catalog: &Catalog) -> CatalogView {
    let keyboard = InlineKeyboard::one_per_row(
        catalog
            .products
            .iter()
            .map(|p| InlineButton::callback(p.name.clone(), format!("product_{}", p.id))),
    );
    CatalogView {
        photo: MediaRef::parse(&catalog.banner),
        caption: catalog.welcome_text.clone(),
        keyboard,
    }
}

pub fn product_view(product: &Product, admin_username: &str) -> CatalogView {
    let caption = format!(
        "🛍 {}\n\n{}\n\n💰 Harga: {}",
        product.name, product.description, product.price
    );
    let keyboard = InlineKeyboard::one_per_row([
        InlineButton::callback(BUY_LABEL, format!("buy_{}", product.id)),
        InlineButton::url(ASK_LABEL, contact_url(admin_username, &product.name)),
        InlineButton::callback(BACK_LABEL, "back"),
    ]);
    CatalogView {
        photo: MediaRef::parse(&product.photo),
        caption,
        keyboard,
    }
}

/// Deep link into a chat with the admin, pre-filled with an enquiry about `product_name`.
pub fn contact_url(admin_username: &str, product_name: &str) -> String {
    let text = format!("Halo saya tertarik dengan {product_name}");
    format!(
        "https://t.me/{}?text={}",
        admin_username.trim_start_matches('@'),
        urlencoding::encode(&text)
    )
}

#[derive(Clone)]
pub struct CatalogPresenter {
    messenger: Arc<dyn MessagingPort>,
    catalog: Arc<Catalog>,
    admin_username: String,
}

impl CatalogPresenter {
    pub fn new(
        messenger: Arc<dyn MessagingPort>,
        catalog: Arc<Catalog>,
        admin_username: impl Into<String>,
    ) -> Self {
        Self {
            messenger,
            catalog,
            admin_username: admin_username.into(),
        }
    }

    pub fn messenger(&self) -> Arc<dyn MessagingPort> {
        self.messenger.clone()
    }

    /// Post a new message with the full catalog.
    pub async fn send_catalog(&self, chat_id: ChatId) -> Result<MessageRef> {
        let view = catalog_view(&self.catalog);
        self.messenger
            .send_photo(chat_id, &view.photo, &view.caption, &view.keyboard)
            .await
    }

    /// Turn an existing message back into the full catalog.
    pub async fn show_catalog_in_place(&self, msg: MessageRef) -> Result<()> {
        self.edit_in_place(msg, catalog_view(&self.catalog)).await
    }

    /// Turn an existing message into `product`'s detail view.
    pub async fn show_product(&self, msg: MessageRef, product: &Product) -> Result<()> {
        self.edit_in_place(msg, product_view(product, &self.admin_username))
            .await
    }

    async fn edit_in_place(&self, msg: MessageRef, view: CatalogView) -> Result<()> {
        match self
            .messenger
            .edit_photo(msg, &view.photo, &view.caption, &view.keyboard)
            .await
        {
            Err(Error::MessageNotModified) => {
                tracing::debug!(chat_id = msg.chat_id.0, "edit skipped: content unchanged");
                Ok(())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageId;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn catalog() -> Catalog {
        Catalog {
            banner: "banner.jpg".to_string(),
            welcome_text: "Selamat datang".to_string(),
            products: vec![
                Product {
                    id: "p1".to_string(),
                    name: "Widget".to_string(),
                    description: "A widget".to_string(),
                    price: "Rp10000".to_string(),
                    photo: "p1.jpg".to_string(),
                    link: "https://shopee/x".to_string(),
                },
                Product {
                    id: "p2".to_string(),
                    name: "Gadget".to_string(),
                    description: "A gadget".to_string(),
                    price: "Rp20000".to_string(),
                    photo: "p2.jpg".to_string(),
                    link: "https://shopee/y".to_string(),
                },
            ],
        }
    }

    /// Edits fail with the configured error; sends always succeed.
    struct EditFailing {
        err: Mutex<Option<Error>>,
    }

    #[async_trait]
    impl MessagingPort for EditFailing {
        async fn send_text(&self, chat_id: ChatId, _text: &str) -> Result<MessageRef> {
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(1),
            })
        }

        async fn send_photo(
            &self,
            chat_id: ChatId,
            _photo: &MediaRef,
            _caption: &str,
            _keyboard: &InlineKeyboard,
        ) -> Result<MessageRef> {
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(1),
            })
        }

        async fn edit_photo(
            &self,
            _msg: MessageRef,
            _photo: &MediaRef,
            _caption: &str,
            _keyboard: &InlineKeyboard,
        ) -> Result<()> {
            match self.err.lock().unwrap().take() {
                Some(e) => Err(e),
                None => Ok(()),
            }
        }

        async fn answer_callback_query(&self, _id: &str, _text: Option<&str>) -> Result<()> {
            Ok(())
        }
    }

    fn msg() -> MessageRef {
        MessageRef {
            chat_id: ChatId(10),
            message_id: MessageId(20),
        }
    }

    #[test]
    fn catalog_view_has_one_row_per_product() {
        let view = catalog_view(&catalog());
        assert_eq!(view.photo, MediaRef::File("banner.jpg".into()));
        assert_eq!(view.caption, "Selamat datang");
        assert_eq!(
            view.keyboard.rows,
            vec![
                vec![InlineButton::callback("Widget", "product_p1")],
                vec![InlineButton::callback("Gadget", "product_p2")],
            ]
        );
    }

    #[test]
    fn product_view_caption_and_buttons() {
        let c = catalog();
        let view = product_view(&c.products[0], "shopadmin");
        assert_eq!(view.caption, "🛍 Widget\n\nA widget\n\n💰 Harga: Rp10000");
        assert_eq!(view.keyboard.rows.len(), 3);
        assert_eq!(
            view.keyboard.rows[0],
            vec![InlineButton::callback(BUY_LABEL, "buy_p1")]
        );
        assert_eq!(
            view.keyboard.rows[1],
            vec![InlineButton::url(
                ASK_LABEL,
                "https://t.me/shopadmin?text=Halo%20saya%20tertarik%20dengan%20Widget"
            )]
        );
        assert_eq!(
            view.keyboard.rows[2],
            vec![InlineButton::callback(BACK_LABEL, "back")]
        );
    }

    #[test]
    fn contact_url_strips_at_and_encodes_unicode() {
        assert_eq!(
            contact_url("@admin", "Kopi & Teh"),
            "https://t.me/admin?text=Halo%20saya%20tertarik%20dengan%20Kopi%20%26%20Teh"
        );
        assert!(contact_url("admin", "Café").ends_with("Caf%C3%A9"));
    }

    #[tokio::test]
    async fn unchanged_edit_is_success() {
        let messenger = Arc::new(EditFailing {
            err: Mutex::new(Some(Error::MessageNotModified)),
        });
        let presenter = CatalogPresenter::new(messenger, Arc::new(catalog()), "admin");
        presenter.show_catalog_in_place(msg()).await.unwrap();
    }

    #[tokio::test]
    async fn other_edit_failures_propagate() {
        let messenger = Arc::new(EditFailing {
            err: Mutex::new(Some(Error::Platform("bad request".to_string()))),
        });
        let c = Arc::new(catalog());
        let presenter = CatalogPresenter::new(messenger, c.clone(), "admin");
        let err = presenter
            .show_product(msg(), &c.products[1])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Platform(_)));
    }
}
