//! Fixed runtime support emitted into every generated `.ts` file: error
//! types, `CallOptions`, and query-param serialization (`spec.md` §4.7).

/// Static TypeScript source for the client-side plumbing.
#[must_use]
pub fn render_runtime_support() -> &'static str {
    r#"export interface CallOptions {
	headers?: Record<string, string>;
	contentType?: string;
	signal?: AbortSignal;
}

export interface Violation {
	field: string;
	description: string;
}

export class ValidationError extends Error {
	readonly violations: Violation[];
	constructor(violations: Violation[]) {
		super(`validation failed: ${violations.length} violation(s)`);
		this.violations = violations;
	}
}

export class ApiError extends Error {
	readonly status: number;
	readonly body: string;
	constructor(status: number, body: string, message: string) {
		super(message || `request failed with status ${status}`);
		this.status = status;
		this.body = body;
	}
}

async function decodeError(resp: Response): Promise<Error> {
	const text = await resp.text();
	try {
		const parsed = JSON.parse(text);
		if (Array.isArray(parsed?.violations) && parsed.violations.length > 0) {
			return new ValidationError(parsed.violations);
		}
		return new ApiError(resp.status, text, parsed?.message ?? "");
	} catch {
		return new ApiError(resp.status, text, "");
	}
}

function addQueryParams(query: URLSearchParams, req: unknown): void {
	if (typeof req !== "object" || req === null) {
		return;
	}
	for (const [key, value] of Object.entries(req as Record<string, unknown>)) {
		if (value === undefined || value === null) {
			continue;
		}
		if (Array.isArray(value)) {
			for (const item of value) {
				query.append(key, String(item));
			}
		} else if (typeof value !== "object") {
			query.set(key, String(value));
		}
	}
}
"#
}
