use std::sync::Arc;

use tillpoint_core::ProductId;
use tillpoint_products::{MenuItem, StoredImage};

use crate::{FileStore, Filter, RemoteError, RemoteStore, Repository};

/// Menu items plus their images.
pub struct MenuCatalog {
    items: Repository<MenuItem>,
    files: Arc<dyn FileStore>,
}

impl MenuCatalog {
    pub fn new(store: Arc<dyn RemoteStore>, files: Arc<dyn FileStore>) -> Self {
        Self {
            items: Repository::new(store),
            files,
        }
    }

    pub fn items(&self) -> &Repository<MenuItem> {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Repository<MenuItem> {
        &mut self.items
    }

    pub async fn refresh(&mut self) -> Result<&[MenuItem], RemoteError> {
        self.items.refresh(&Filter::all().order_by("name", crate::Order::Asc)).await
    }

    /// Items the register can currently sell.
    pub fn available(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.cached().iter().filter(|i| i.available)
    }

    /// Uploads a new image for `id`, saves its url/path on the item and
    /// removes the previous object.
    ///
    /// If saving the item fails the new upload is removed again and the item
    /// keeps its old image.
    pub async fn replace_image(
        &mut self,
        id: &ProductId,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<MenuItem, RemoteError> {
        let mut item = self.items.find_cached(id).cloned().ok_or(RemoteError::NotFound)?;

        let path = format!("menu/{id}/{file_name}");
        let uploaded = self.files.upload(&path, bytes, content_type).await?;
        let previous = item.replace_image(StoredImage {
            url: uploaded.url,
            path: uploaded.path.clone(),
        });

        let saved = match self.items.update(&item).await {
            Ok(saved) => saved,
            Err(err) => {
                if let Err(cleanup) = self.files.remove(&uploaded.path).await {
                    tracing::warn!(path = %uploaded.path, error = %cleanup, "orphaned image upload");
                }
                return Err(err);
            }
        };

        if let Some(old) = previous.filter(|old| old.path != uploaded.path) {
            if let Err(err) = self.files.remove(&old.path).await {
                tracing::warn!(path = %old.path, error = %err, "failed to remove previous image");
            }
        }
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryFileStore, InMemoryRemoteStore};
    use tillpoint_products::{MenuItemDraft, validate_menu_item};

    fn latte() -> MenuItem {
        let draft = MenuItemDraft {
            name: "Latte".to_string(),
            category: "drink".to_string(),
            price: "45.00".to_string(),
            available: true,
        };
        MenuItem::new(ProductId::new(), validate_menu_item(&draft).unwrap())
    }

    #[tokio::test]
    async fn replace_image_swaps_objects() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let files = Arc::new(InMemoryFileStore::new());
        let mut catalog = MenuCatalog::new(store, files.clone());
        let item = catalog.items_mut().create(latte()).await.unwrap();

        let first = catalog
            .replace_image(&item.id, "a.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        let first_path = first.image.clone().unwrap().path;
        assert!(files.contains(&first_path).await);

        let second = catalog
            .replace_image(&item.id, "b.png", vec![4, 5], "image/png")
            .await
            .unwrap();
        let second_path = second.image.unwrap().path;
        assert!(files.contains(&second_path).await);
        assert!(!files.contains(&first_path).await);
        assert_eq!(files.len().await, 1);
    }

    #[tokio::test]
    async fn failed_save_rolls_back_upload() {
        let store = Arc::new(InMemoryRemoteStore::new());
        let files = Arc::new(InMemoryFileStore::new());
        let mut catalog = MenuCatalog::new(store.clone(), files.clone());
        let item = catalog.items_mut().create(latte()).await.unwrap();

        store.fail_next(RemoteError::Network("offline".into()));
        let err = catalog
            .replace_image(&item.id, "a.png", vec![1], "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Network(_)));
        assert_eq!(files.len().await, 0);
        assert!(catalog.items().find_cached(&item.id).unwrap().image.is_none());
    }
}
