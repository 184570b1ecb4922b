//! Server-rendered HTML pages.

use crate::gallery::{ImageListResponse, ImageRecord, Operation};
use maud::{html, Markup, DOCTYPE};

fn download_url(filename: &str) -> String {
    format!("/download/{}", urlencoding::encode(filename))
}

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
            }
            body {
                h1 { a href="/" { "darkroom" } }
                (body)
            }
        }
    }
}

/// Listing of all stored images with the upload form.
pub fn index_page(list: &ImageListResponse) -> Markup {
    layout(
        "Images",
        html! {
            form action="/upload" method="post" enctype="multipart/form-data" {
                input type="file" name="file" accept=".jpg";
                button type="submit" { "Upload" }
            }
            @if list.images.is_empty() {
                p { "No images yet." }
            } @else {
                ul class="images" {
                    @for image in &list.images {
                        li {
                            img src=(download_url(&image.filename)) alt=(image.filename) width="160";
                            span class="filename" { (image.filename) }
                            a href=(format!("/edit/{}", image.id)) { "Edit" }
                            " "
                            a href=(download_url(&image.filename)) { "Download" }
                            form action=(format!("/delete/{}", image.id)) method="post" {
                                button type="submit" { "Delete" }
                            }
                        }
                    }
                }
            }
            @if let Some(limit) = list.limit {
                nav {
                    @if list.offset > 0 {
                        a href=(format!("/?offset={}&limit={}", list.offset.saturating_sub(limit), limit)) { "Previous" }
                        " "
                    }
                    @if list.offset.saturating_add(limit) < list.total {
                        a href=(format!("/?offset={}&limit={}", list.offset.saturating_add(limit), limit)) { "Next" }
                    }
                }
            }
        },
    )
}

/// Edit form for one image.
pub fn edit_page(image: &ImageRecord) -> Markup {
    layout(
        &format!("Edit {}", image.filename),
        html! {
            h2 { "Edit " (image.filename) }
            img src=(download_url(&image.filename)) alt=(image.filename) width="320";
            form action=(format!("/edit/{}", image.id)) method="post" {
                @for op in Operation::ALL {
                    label {
                        input type="checkbox" name="options" value=(op.name());
                        " " (op.label())
                    }
                    br;
                }
                button type="submit" { "Apply" }
            }
        },
    )
}
