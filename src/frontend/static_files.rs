use axum::{
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};

pub fn create_static_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/static/css/modules.css", get(serve_modules_css))
        .route("/static/js/modules.js", get(serve_modules_js))
}

async fn serve_modules_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], MODULES_CSS)
}

async fn serve_modules_js() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], MODULES_JS)
}

pub const MODULES_CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; background: #f5f5f5; color: #333; }
.navbar { display: flex; justify-content: space-between; background: #363636; padding: 12px 24px; }
.navbar-brand { color: #fff; font-weight: 600; text-decoration: none; }
.navbar-item { color: #fff; text-decoration: none; }
.container { max-width: 960px; margin: 24px auto; padding: 0 16px; }
.page-header { display: flex; justify-content: space-between; align-items: center; }
.title { margin: 0 0 16px 0; }
.notification { background: #e8f4fd; border-radius: 4px; padding: 12px 16px; margin-bottom: 16px; }
.notification.is-danger { background: #fdecea; }
.empty-state { color: #777; }
.card { background: #fff; border-radius: 6px; box-shadow: 0 1px 3px rgba(0,0,0,0.12); margin-bottom: 12px; }
.card-header { display: flex; justify-content: space-between; padding: 12px 16px; cursor: pointer; user-select: none; }
.card-header-title { margin: 0; font-weight: 600; }
.card-content { padding: 0 16px 16px 16px; }
.module-details th { text-align: left; padding-right: 24px; color: #555; }
.module-details td { word-break: break-all; }
.buttons { display: flex; gap: 8px; align-items: center; margin-top: 12px; }
.button { border: 1px solid #dbdbdb; background: #fff; border-radius: 4px; padding: 6px 14px; cursor: pointer; text-decoration: none; color: #363636; font-size: 0.95em; }
.button.is-success { background: #48c78e; border-color: transparent; color: #fff; }
.button.is-danger { background: #f14668; border-color: transparent; color: #fff; }
.button[disabled] { opacity: 0.5; cursor: not-allowed; }
.hint { color: #777; font-size: 0.9em; }
.label { display: block; font-weight: 600; margin: 12px 0 4px 0; }
.input, .textarea { width: 100%; box-sizing: border-box; padding: 6px 8px; border: 1px solid #dbdbdb; border-radius: 4px; }
.textarea { font-family: monospace; }
.modal { display: none; position: fixed; inset: 0; z-index: 40; align-items: center; justify-content: center; }
.modal.is-active { display: flex; }
.modal-background { position: absolute; inset: 0; background: rgba(10,10,10,0.6); }
.modal-card { position: relative; background: #fff; border-radius: 6px; width: 480px; max-width: 90vw; }
.modal-card-head, .modal-card-body, .modal-card-foot { padding: 16px; }
.modal-card-title { margin: 0; font-weight: 600; }
.modal-card-foot { display: flex; gap: 8px; border-top: 1px solid #eee; }
"#;

/// Card toggling, the install dialog and the two-step uninstall confirmation.
pub const MODULES_JS: &str = r#"
(function () {
    'use strict';

    // Uninstall confirmation is either idle or awaiting a specific module.
    const Confirm = {
        state: { kind: 'idle' },
        request(name) {
            this.state = { kind: 'awaiting', name: name };
        },
        cancel() {
            this.state = { kind: 'idle' };
        },
        take() {
            const state = this.state;
            this.state = { kind: 'idle' };
            return state.kind === 'awaiting' ? state.name : null;
        },
    };

    function openModal(modal) {
        if (modal) {
            modal.classList.add('is-active');
        }
    }

    function closeModal(modal) {
        if (modal) {
            modal.classList.remove('is-active');
        }
    }

    function submitDelete(name) {
        const form = document.createElement('form');
        form.method = 'POST';
        form.action = '/modules/delete/' + encodeURIComponent(name);
        document.body.appendChild(form);
        form.submit();
    }

    document.querySelectorAll('[data-card-toggle]').forEach(function (header) {
        header.addEventListener('click', function () {
            const content = header.parentElement.querySelector('.card-content');
            if (content) {
                content.hidden = !content.hidden;
            }
        });
    });

    const addModal = document.getElementById('add-module-modal');
    const deleteModal = document.getElementById('delete-module-modal');
    const deleteName = document.getElementById('delete-module-name');

    document.querySelectorAll('[data-install-module]').forEach(function (button) {
        button.addEventListener('click', function () {
            openModal(addModal);
        });
    });

    document.querySelectorAll('[data-uninstall]').forEach(function (button) {
        button.addEventListener('click', function (event) {
            event.stopPropagation();
            const name = button.getAttribute('data-uninstall');
            Confirm.request(name);
            if (deleteName) {
                deleteName.textContent = name;
            }
            openModal(deleteModal);
        });
    });

    document.querySelectorAll('[data-confirm-delete]').forEach(function (button) {
        button.addEventListener('click', function () {
            const name = Confirm.take();
            closeModal(deleteModal);
            if (name !== null) {
                submitDelete(name);
            }
        });
    });

    document.querySelectorAll('[data-modal-close]').forEach(function (element) {
        element.addEventListener('click', function () {
            const modal = element.closest('.modal');
            if (modal === deleteModal) {
                Confirm.cancel();
            }
            closeModal(modal);
        });
    });
})();
"#;
