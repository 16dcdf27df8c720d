pub mod load_pdfs_request;
pub mod load_pdfs_route;
