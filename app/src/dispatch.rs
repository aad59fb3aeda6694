use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::browser::{CatalogEvent, Command};
use crate::yts::Catalog;

/// Runs browser commands as tasks against the catalog and reports each
/// outcome as a [`CatalogEvent`].
pub struct Dispatcher<C: Catalog> {
    catalog: Arc<C>,
    events: UnboundedSender<CatalogEvent>,
    list_task: Option<JoinHandle<()>>,
}

impl<C: Catalog> Dispatcher<C> {
    pub fn new(catalog: Arc<C>, events: UnboundedSender<CatalogEvent>) -> Self {
        Self {
            catalog,
            events,
            list_task: None,
        }
    }

    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::FetchList(request) => {
                // A newer generation supersedes whatever list fetch is in flight.
                if let Some(task) = self.list_task.take() {
                    task.abort();
                }

                let catalog = Arc::clone(&self.catalog);
                let events = self.events.clone();
                self.list_task = Some(tokio::spawn(async move {
                    let result = catalog.list_movies(&request.options).await;
                    if let Err(err) = &result {
                        error!("List generation {} failed: {}", request.generation, err);
                    }
                    send(
                        &events,
                        CatalogEvent::ListLoaded {
                            generation: request.generation,
                            result,
                        },
                    );
                }));
            }
            Command::FetchGenres(request) => {
                let catalog = Arc::clone(&self.catalog);
                let events = self.events.clone();
                tokio::spawn(async move {
                    let result = catalog.sample_movies(request.limit).await;
                    if let Err(err) = &result {
                        error!("Genre sample failed: {}", err);
                    }
                    send(&events, CatalogEvent::GenresLoaded(result));
                });
            }
            Command::FetchDetail(request) => {
                let catalog = Arc::clone(&self.catalog);
                let events = self.events.clone();
                tokio::spawn(async move {
                    let result = catalog.movie_details(&request.movie_id).await;
                    if let Err(err) = &result {
                        error!("Details for movie {} failed: {}", request.movie_id, err);
                    }
                    send(
                        &events,
                        CatalogEvent::DetailLoaded {
                            movie_id: request.movie_id,
                            result,
                        },
                    );
                });
            }
        }
    }
}

fn send(events: &UnboundedSender<CatalogEvent>, event: CatalogEvent) {
    if events.send(event).is_err() {
        debug!("Browser closed before a fetch finished");
    }
}
