//! Fixed runtime support for generated Go clients: the transport injection
//! point, call options, and typed error surfacing (`spec.md` §4.6).

/// Static Go source for the client-side plumbing.
#[must_use]
pub fn render_runtime_support() -> &'static str {
    r#"// HTTPDoer is the injection point for logging, interception, retries, or
// test doubles; *http.Client satisfies it.
type HTTPDoer interface {
	Do(req *http.Request) (*http.Response, error)
}

// CallOption overrides per-call behavior: extra headers or a non-default
// Content-Type.
type CallOption func(*callOptions)

type callOptions struct {
	headers     map[string]string
	contentType string
}

func newCallOptions(opts []CallOption) *callOptions {
	call := &callOptions{headers: map[string]string{}}
	for _, opt := range opts {
		opt(call)
	}
	return call
}

func WithHeader(name, value string) CallOption {
	return func(c *callOptions) { c.headers[name] = value }
}

func WithContentType(contentType string) CallOption {
	return func(c *callOptions) { c.contentType = contentType }
}

// ValidationError mirrors the server's 400 body.
type ValidationError struct {
	Violations []Violation `json:"violations"`
}

type Violation struct {
	Field       string `json:"field"`
	Description string `json:"description"`
}

func (e *ValidationError) Error() string {
	return fmt.Sprintf("validation failed: %d violation(s)", len(e.Violations))
}

// ApiError is the generic error surfaced for non-validation 4xx/5xx bodies.
type ApiError struct {
	Status  int    `json:"-"`
	Body    string `json:"-"`
	Message string `json:"message"`
}

func (e *ApiError) Error() string {
	if e.Message != "" {
		return e.Message
	}
	return fmt.Sprintf("request failed with status %d", e.Status)
}

func decodeError(resp *http.Response) error {
	data, _ := io.ReadAll(resp.Body)
	var validation ValidationError
	if json.Unmarshal(data, &validation) == nil && len(validation.Violations) > 0 {
		return &validation
	}
	var apiErr ApiError
	_ = json.Unmarshal(data, &apiErr)
	apiErr.Status = resp.StatusCode
	apiErr.Body = string(data)
	return &apiErr
}

func encodeRequestBody(contentType string, req interface{}) (io.Reader, error) {
	switch contentType {
	case "application/x-protobuf":
		if m, ok := req.(proto.Message); ok {
			data, err := proto.Marshal(m)
			if err != nil {
				return nil, err
			}
			return bytes.NewReader(data), nil
		}
		return nil, fmt.Errorf("request does not implement proto.Message")
	default:
		data, err := json.Marshal(req)
		if err != nil {
			return nil, err
		}
		return bytes.NewReader(data), nil
	}
}

func decodeResponseBody(contentType string, body io.Reader, dst interface{}) error {
	switch contentType {
	case "application/x-protobuf":
		data, err := io.ReadAll(body)
		if err != nil {
			return err
		}
		if m, ok := dst.(proto.Message); ok {
			return proto.Unmarshal(data, m)
		}
		return fmt.Errorf("destination does not implement proto.Message")
	default:
		return json.NewDecoder(body).Decode(dst)
	}
}

// addQueryParams copies query-annotated struct fields into values by JSON
// tag name, mirroring the server's bindQueryParams in reverse.
func addQueryParams(values url.Values, src interface{}) {
	v := reflect.ValueOf(src)
	if v.Kind() == reflect.Ptr {
		if v.IsNil() {
			return
		}
		v = v.Elem()
	}
	t := v.Type()
	for i := 0; i < t.NumField(); i++ {
		field := t.Field(i)
		tag := strings.Split(field.Tag.Get("json"), ",")[0]
		if tag == "" || tag == "-" {
			continue
		}
		fv := v.Field(i)
		if fv.Kind() == reflect.Ptr {
			if fv.IsNil() {
				continue
			}
			fv = fv.Elem()
		}
		switch fv.Kind() {
		case reflect.Slice:
			for i := 0; i < fv.Len(); i++ {
				values.Add(tag, fmt.Sprintf("%v", fv.Index(i).Interface()))
			}
		case reflect.Struct, reflect.Map:
			// message-typed and map-typed fields are never query params.
		default:
			if !fv.IsZero() {
				values.Set(tag, fmt.Sprintf("%v", fv.Interface()))
			}
		}
	}
}
"#
}
